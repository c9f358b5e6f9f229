//! View model for the prayer board.
//!
//! Answered requests get a badge, and their testimony (when there is one)
//! is a separate block from the original message.

use std::fmt;

use chrono::FixedOffset;

use crate::board::FeedState;
use crate::models::PrayerRequest;

pub const ANSWERED_BADGE: &str = "Respondida";
pub const TESTIMONY_HEADING: &str = "Oração Respondida!";
pub const EMPTY_BOARD_TEXT: &str = "Nenhum pedido de oração ainda";
pub const UNAVAILABLE_TEXT: &str = "Não foi possível carregar os pedidos";
pub const LOADING_TEXT: &str = "Carregando pedidos...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardView {
    Loading,
    /// The feed could not be fetched. Not the same as an empty board.
    Unavailable,
    /// The store answered with zero requests.
    Empty,
    Cards(Vec<PrayerCard>),
}

impl BoardView {
    pub fn from_feed(feed: &FeedState, offset: &FixedOffset) -> Self {
        match feed {
            FeedState::Loading => Self::Loading,
            FeedState::Failed => Self::Unavailable,
            FeedState::Loaded(requests) if requests.is_empty() => Self::Empty,
            FeedState::Loaded(requests) => Self::Cards(
                requests
                    .iter()
                    .map(|r| PrayerCard::from_request(r, offset))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => f.write_str(LOADING_TEXT),
            Self::Unavailable => f.write_str(UNAVAILABLE_TEXT),
            Self::Empty => f.write_str(EMPTY_BOARD_TEXT),
            Self::Cards(cards) => {
                for (i, card) in cards.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{card}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerCard {
    pub id: String,
    pub name: String,
    pub message: String,
    /// `dd/mm/yyyy`
    pub date_label: String,
    /// Show the "answered" badge.
    pub answered: bool,
    pub testimony: Option<TestimonyBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestimonyBlock {
    pub heading: &'static str,
    pub text: String,
}

impl PrayerCard {
    pub fn from_request(request: &PrayerRequest, offset: &FixedOffset) -> Self {
        Self {
            id: request.id.clone(),
            name: request.name.clone(),
            message: request.message.clone(),
            date_label: request
                .created_at
                .with_timezone(offset)
                .format("%d/%m/%Y")
                .to_string(),
            answered: request.status.is_answered(),
            testimony: request.status.testimony().map(|text| TestimonyBlock {
                heading: TESTIMONY_HEADING,
                text: text.to_string(),
            }),
        }
    }
}

impl fmt::Display for PrayerCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} · {}", self.name, self.date_label)?;
        writeln!(f, "{}", self.message)?;
        if let Some(block) = &self.testimony {
            writeln!(f, "  ✓ {}", block.heading)?;
            writeln!(f, "  {}", block.text)?;
        }
        if self.answered {
            writeln!(f, "[{ANSWERED_BADGE}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::models::RequestStatus;

    fn request(status: RequestStatus) -> PrayerRequest {
        PrayerRequest {
            id: "p1".to_string(),
            name: "Maria".to_string(),
            message: "Pray for health".to_string(),
            is_public: true,
            status,
            created_at: Utc.with_ymd_and_hms(2024, 3, 10, 1, 30, 0).unwrap(),
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn answered_with_testimony_shows_badge_and_block() {
        let card = PrayerCard::from_request(
            &request(RequestStatus::Answered {
                testimony: Some("X".to_string()),
            }),
            &utc(),
        );
        assert!(card.answered);
        assert_eq!(card.testimony.as_ref().map(|t| t.text.as_str()), Some("X"));
        assert_eq!(card.message, "Pray for health");

        let text = card.to_string();
        assert!(text.contains(ANSWERED_BADGE));
        assert!(text.contains(TESTIMONY_HEADING));
        assert!(text.contains("X"));
    }

    #[test]
    fn answered_without_testimony_shows_badge_only() {
        let card =
            PrayerCard::from_request(&request(RequestStatus::Answered { testimony: None }), &utc());
        assert!(card.answered);
        assert!(card.testimony.is_none());

        let text = card.to_string();
        assert!(text.contains(ANSWERED_BADGE));
        assert!(!text.contains(TESTIMONY_HEADING));
    }

    #[test]
    fn approved_request_has_neither() {
        let card = PrayerCard::from_request(&request(RequestStatus::Approved), &utc());
        assert!(!card.answered);
        assert!(card.testimony.is_none());
        assert!(!card.to_string().contains(ANSWERED_BADGE));
    }

    #[test]
    fn date_label_follows_the_display_offset() {
        let req = request(RequestStatus::Approved);
        assert_eq!(PrayerCard::from_request(&req, &utc()).date_label, "10/03/2024");

        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(PrayerCard::from_request(&req, &brt).date_label, "09/03/2024");
    }

    #[test]
    fn feed_states_map_to_distinct_views() {
        assert_eq!(BoardView::from_feed(&FeedState::Loading, &utc()), BoardView::Loading);
        assert_eq!(BoardView::from_feed(&FeedState::Failed, &utc()), BoardView::Unavailable);
        assert_eq!(
            BoardView::from_feed(&FeedState::Loaded(vec![]), &utc()),
            BoardView::Empty
        );
        assert_ne!(BoardView::Unavailable.to_string(), BoardView::Empty.to_string());

        let BoardView::Cards(cards) =
            BoardView::from_feed(&FeedState::Loaded(vec![request(RequestStatus::Approved)]), &utc())
        else {
            panic!("expected cards");
        };
        assert_eq!(cards.len(), 1);
    }
}
