use serde::Serialize;

/// Verdict of a completed test node, suite or file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Ok,
    Failed,
    Error,
    Ignored,
}

impl ResultKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Failed => "failed",
            Self::Error => "error",
            Self::Ignored => "ignored",
        }
    }

    /// Numeric code used in observer payloads.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Failed => 1,
            Self::Error => 2,
            Self::Ignored => 3,
        }
    }
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One counter per [`ResultKind`].
///
/// Counters only ever grow. They are folded upward as return values: nodes
/// produce a single kind, suites and files merge what their children return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultCounters {
    pub ok: usize,
    pub failed: usize,
    pub error: usize,
    pub ignored: usize,
}

impl ResultCounters {
    /// Counters holding exactly one verdict.
    #[must_use]
    pub fn single(kind: ResultKind) -> Self {
        let mut counters = Self::default();
        counters.record(kind);
        counters
    }

    /// Counters for `count` nodes skipped in bulk.
    #[must_use]
    pub const fn ignored(count: usize) -> Self {
        Self {
            ok: 0,
            failed: 0,
            error: 0,
            ignored: count,
        }
    }

    pub fn record(&mut self, kind: ResultKind) {
        match kind {
            ResultKind::Ok => self.ok += 1,
            ResultKind::Failed => self.failed += 1,
            ResultKind::Error => self.error += 1,
            ResultKind::Ignored => self.ignored += 1,
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.ok += other.ok;
        self.failed += other.failed;
        self.error += other.error;
        self.ignored += other.ignored;
    }

    #[must_use]
    pub const fn get(&self, kind: ResultKind) -> usize {
        match kind {
            ResultKind::Ok => self.ok,
            ResultKind::Failed => self.failed,
            ResultKind::Error => self.error,
            ResultKind::Ignored => self.ignored,
        }
    }

    /// Number of verdicts recorded.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.ok + self.failed + self.error + self.ignored
    }

    /// Whether anything failed or errored.
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0 || self.error > 0
    }

    /// The kind that summarizes these counters as a whole.
    #[must_use]
    pub const fn overall(&self) -> ResultKind {
        if self.error > 0 {
            ResultKind::Error
        } else if self.failed > 0 {
            ResultKind::Failed
        } else if self.ok == 0 && self.ignored > 0 {
            ResultKind::Ignored
        } else {
            ResultKind::Ok
        }
    }
}

impl std::ops::AddAssign for ResultCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
