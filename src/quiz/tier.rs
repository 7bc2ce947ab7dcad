use std::fmt;

/// Outcome band for a finished session; it only picks a presentation theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Poor,
    Ok,
    Great,
    Perfect,
}

impl Tier {
    /// The thresholds assume a five-question session and are not rescaled for
    /// shorter ones, so `total` does not take part in the decision.
    pub fn classify(score: usize, _total: usize) -> Tier {
        match score {
            0..=1 => Tier::Poor,
            2..=3 => Tier::Ok,
            4 => Tier::Great,
            _ => Tier::Perfect,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Poor => "poor",
            Tier::Ok => "ok",
            Tier::Great => "great",
            Tier::Perfect => "perfect",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Tier::Poor => "Don't lose heart, next time will be better! Let's keep at it together.",
            Tier::Ok => "Nicely done, keep up the effort!",
            Tier::Great => "Impressive! Almost perfect, keep going!",
            Tier::Perfect => "Amazing! You got every question right! 🎉🎉",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
