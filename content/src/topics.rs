use rand::Rng;

/// Topics used when none are configured.
pub const DEFAULT_TOPICS: &[&str] = &[
    "computer networking",
    "Windows Server 2019",
    "Linux administration",
    "PC assembly",
    "computer troubleshooting",
    "printer troubleshooting",
    "camera troubleshooting",
];

/// A non-empty topic list with uniform random choice.
#[derive(Debug, Clone)]
pub struct TopicPicker {
    topics: Vec<String>,
}

impl TopicPicker {
    /// Build a picker from `topics`, dropping blank entries.
    ///
    /// Returns `None` when nothing usable is left.
    pub fn new<I, T>(topics: I) -> Option<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let topics: Vec<String> = topics
            .into_iter()
            .map(Into::into)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if topics.is_empty() {
            return None;
        }

        Some(Self { topics })
    }

    pub fn with_defaults() -> Self {
        Self {
            topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn pick(&self) -> &str {
        self.pick_with(&mut rand::thread_rng())
    }

    pub fn pick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // Non-empty by construction.
        let idx = rng.gen_range(0..self.topics.len());
        &self.topics[idx]
    }
}
