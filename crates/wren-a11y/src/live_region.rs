//! Live Region Support
//!
//! One announcement channel per page. Each `announce` replaces the previous
//! text outright: there is no queue and no history, last write wins.

use std::str::FromStr;

use wren_dom::{Document, NodeId};

use crate::A11yError;

/// `aria-live` politeness level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Politeness {
    Off,
    #[default]
    Polite,
    Assertive,
}

impl Politeness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

impl FromStr for Politeness {
    type Err = A11yError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "polite" => Ok(Self::Polite),
            "assertive" => Ok(Self::Assertive),
            _ => Err(A11yError::InvalidPoliteness(s.to_string())),
        }
    }
}

/// Page-wide announcement channel
///
/// Created by the host at startup and owned by it. Only `announce` (and
/// `announce_fresh`) change the text; the mounted region node mirrors it for
/// assistive technology.
#[derive(Debug, Default)]
pub struct LiveAnnouncer {
    message: String,
    politeness: Politeness,
    generation: u64,
    region: Option<NodeId>,
}

impl LiveAnnouncer {
    pub fn new(politeness: Politeness) -> Self {
        Self {
            politeness,
            ..Default::default()
        }
    }

    /// Replace the current announcement; an empty string clears it
    pub fn announce(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.generation += 1;
        tracing::debug!(politeness = self.politeness.as_str(), "announce: {:?}", self.message);
    }

    /// Clear, then set `message`, so a repeat of the same text still counts
    /// as a change for screen readers
    pub fn announce_fresh(&mut self, message: impl Into<String>) {
        self.announce(String::new());
        self.announce(message);
    }

    /// Current announcement
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Number of updates so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn politeness(&self) -> Politeness {
        self.politeness
    }

    /// Create the `<p aria-live>` region at the end of `<body>`
    pub fn mount(&mut self, doc: &mut Document) -> Result<NodeId, A11yError> {
        if let Some(region) = self.region {
            return Ok(region);
        }
        let region = doc.append_element(doc.body(), "p")?;
        let tree = doc.tree_mut();
        tree.set_attribute(region, "aria-live", self.politeness.as_str())?;
        tree.set_attribute(region, "class", "sr-only")?;
        tree.set_attribute(region, "data-testid", "live-region")?;
        self.region = Some(region);
        self.render(doc)?;
        Ok(region)
    }

    /// Copy the current message into the mounted region
    pub fn render(&self, doc: &mut Document) -> Result<(), A11yError> {
        if let Some(region) = self.region {
            doc.tree_mut().set_text_content(region, &self.message)?;
        }
        Ok(())
    }
}
