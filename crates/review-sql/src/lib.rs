pub mod backlog;
pub mod projects;
pub mod status;

mod pool;
pub use pool::connect;

/// ReviewStage enumerates the two sequential human-review checkpoints an
/// item passes through. Whether an item awaits a given stage is derived
/// from its review flags and threat score, never stored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReviewStage {
    AwaitingFirst,
    AwaitingSecond,
}

impl ReviewStage {
    /// SQL predicate over `tweet_record` (aliased `tr`) selecting items
    /// which await this stage. These fragments are a closed enumeration:
    /// caller-supplied values are never spliced into query text, and are
    /// always passed as bound parameters instead.
    pub const fn predicate(self) -> &'static str {
        match self {
            ReviewStage::AwaitingFirst => "tr.reviewed_h1 = false and tr.threat > 0",
            ReviewStage::AwaitingSecond => {
                "tr.reviewed_h2 = false and tr.abusive_h1 = true and tr.threat > 0"
            }
        }
    }
}
