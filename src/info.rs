//! Structured search progress reports, decoupled from any particular
//! text protocol. `InfoSink` is a plain callback rather than a hardcoded
//! channel type, so callers can format to UCI/xboard or just collect.

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default)]
pub struct SearchInfo {
    pub depth: Option<u32>,
    pub seldepth: Option<u32>,
    pub nodes: Option<u64>,
    pub nps: Option<u64>,
    pub time_ms: Option<u128>,
    pub score_cp: Option<i32>,
    pub score_mate: Option<i32>,
    pub pv: Option<String>,
    pub hashfull: Option<u32>,
}

impl SearchInfo {
    pub fn to_uci_line(&self) -> String {
        let mut parts = Vec::new();
        if let Some(d) = self.depth {
            parts.push(format!("depth {d}"));
        }
        if let Some(sd) = self.seldepth {
            parts.push(format!("seldepth {sd}"));
        }
        if let Some(n) = self.nodes {
            parts.push(format!("nodes {n}"));
        }
        if let Some(nps) = self.nps {
            parts.push(format!("nps {nps}"));
        }
        if let Some(t) = self.time_ms {
            parts.push(format!("time {t}"));
        }
        if let Some(cp) = self.score_cp {
            parts.push(format!("score cp {cp}"));
        }
        if let Some(mate) = self.score_mate {
            parts.push(format!("score mate {mate}"));
        }
        if let Some(hf) = self.hashfull {
            parts.push(format!("hashfull {hf}"));
        }
        if let Some(ref pv) = self.pv {
            parts.push(format!("pv {pv}"));
        }
        if parts.is_empty() {
            "info".to_string()
        } else {
            format!("info {}", parts.join(" "))
        }
    }
}

/// Callback invoked once per completed iterative-deepening depth.
pub type InfoSink<'a> = dyn FnMut(SearchInfo) + 'a;
