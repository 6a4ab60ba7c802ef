use crate::config::BubbleConfig;
use crate::item::{Item, ItemId};

/// Maps a vote count to a bubble diameter: `base + sqrt(votes) * scale`,
/// capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleScale {
    pub base: f64,
    pub scale: f64,
    pub max: f64,
}

impl Default for BubbleScale {
    fn default() -> Self {
        BubbleConfig::default().into()
    }
}

impl From<BubbleConfig> for BubbleScale {
    fn from(config: BubbleConfig) -> Self {
        Self {
            base: config.base,
            scale: config.scale,
            max: config.max,
        }
    }
}

impl BubbleScale {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size(&self, votes: u64) -> f64 {
        (votes as f64)
            .sqrt()
            .mul_add(self.scale, self.base)
            .min(self.max)
    }

    /// [`Self::size`] rounded to whole pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn size_px(&self, votes: u64) -> u32 {
        let rounded = self.size(votes).round();
        if rounded.is_nan() || rounded <= 0.0 {
            return 0;
        }
        rounded.min(f64::from(u32::MAX)) as u32
    }

    #[must_use]
    pub fn bubble(&self, item: &Item) -> Bubble {
        Bubble {
            id: item.id,
            name: item.name.clone(),
            votes: item.votes,
            size_px: self.size_px(item.votes),
            label: vote_label(item.votes),
            voted_by_me: item.voted_by_me,
        }
    }
}

/// "1 vote", "0 votes", "12 votes".
#[must_use]
pub fn vote_label(votes: u64) -> String {
    if votes == 1 {
        "1 vote".to_string()
    } else {
        format!("{votes} votes")
    }
}

/// Everything a view needs to draw one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub id: ItemId,
    pub name: String,
    pub votes: u64,
    pub size_px: u32,
    pub label: String,
    pub voted_by_me: bool,
}
