//! Outbound device actions: dialer, maps, social links and calendar entries.
//!
//! The functions here only build URIs and entries; opening them is up to the
//! host platform. The device calendar sits behind [`CalendarDevice`].

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use tracing::{info, warn};
use url::Url;

use crate::config::Venue;
use crate::errors::{BoardError, Result};
use crate::models::Event;
use crate::schedule::{next_occurrence, ScheduleDay, Service};

/// Marker left in media links that have not been set up yet.
const MEDIA_PLACEHOLDER: &str = "FOLDER_ID";

/// `tel:` URI with every non-digit removed. `None` when no digits remain.
pub fn dial_uri(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then(|| format!("tel:{digits}"))
}

pub fn instagram_url(handle: &str) -> Result<Url> {
    let username = handle.trim().trim_start_matches('@');
    Ok(Url::parse("https://instagram.com/")?.join(username)?)
}

pub fn waze_url(address: &str) -> Result<Url> {
    Ok(Url::parse_with_params("https://waze.com/ul", &[("q", address)])?)
}

/// Links served by the API (maps, WhatsApp) are opened as they are.
pub fn external_url(raw: &str) -> Result<Url> {
    Ok(Url::parse(raw)?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaLink {
    Ready(Url),
    /// The folder has not been shared yet; tell the user to get in touch.
    NotConfigured,
}

pub fn media_link(raw: &str) -> Result<MediaLink> {
    if raw.trim().is_empty() || raw.contains(MEDIA_PLACEHOLDER) {
        return Ok(MediaLink::NotConfigured);
    }
    Ok(MediaLink::Ready(Url::parse(raw)?))
}

// ─────────────────────────────────────────────────────────
// Calendar
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEntry {
    pub title: String,
    pub notes: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub location: String,
    pub timezone: String,
}

impl CalendarEntry {
    /// Entry for the next occurrence of a weekly service after `today`.
    pub fn for_service(
        day: &ScheduleDay,
        service: &Service,
        today: NaiveDate,
        venue: &Venue,
        duration: Duration,
    ) -> Option<Self> {
        let date = next_occurrence(day.weekday, today);
        let start = local_start(date, service.start_time()?, venue)?;
        Some(Self::at(service.title, service.description, start, venue, duration))
    }

    /// Entry for a special event, using its local `HH:MM` start time on the
    /// event's date. Falls back to the event timestamp when the time is unreadable.
    pub fn for_event(event: &Event, venue: &Venue, duration: Duration) -> Self {
        let local = event.date.with_timezone(&venue.utc_offset);
        let start = NaiveTime::parse_from_str(event.time.trim(), "%H:%M")
            .ok()
            .and_then(|time| local_start(local.date_naive(), time, venue))
            .unwrap_or(local);
        Self::at(&event.title, &event.description, start, venue, duration)
    }

    fn at(
        title: &str,
        notes: &str,
        start: DateTime<FixedOffset>,
        venue: &Venue,
        duration: Duration,
    ) -> Self {
        Self {
            title: title.to_string(),
            notes: notes.to_string(),
            start,
            end: start + duration,
            location: venue.address.clone(),
            timezone: venue.timezone.clone(),
        }
    }
}

fn local_start(date: NaiveDate, time: NaiveTime, venue: &Venue) -> Option<DateTime<FixedOffset>> {
    venue
        .utc_offset
        .from_local_datetime(&date.and_time(time))
        .single()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCalendar {
    pub id: String,
    pub title: String,
    pub allows_modifications: bool,
}

/// The device calendar, provided by the host platform.
#[async_trait]
pub trait CalendarDevice: Send + Sync {
    /// Ask the user for access. `false` when denied.
    async fn request_permission(&self) -> bool;

    async fn calendars(&self) -> Result<Vec<DeviceCalendar>>;

    /// Create the entry and return its device-side id.
    async fn create_entry(&self, calendar_id: &str, entry: &CalendarEntry) -> Result<String>;
}

/// Add `entry` to the first writable calendar (or the first calendar at all).
///
/// Nothing is created when permission is denied or no calendar exists.
pub async fn add_to_calendar<D>(device: &D, entry: &CalendarEntry) -> Result<String>
where
    D: CalendarDevice + ?Sized,
{
    if !device.request_permission().await {
        warn!("Calendar permission denied");
        return Err(BoardError::CalendarPermission);
    }

    let calendars = device.calendars().await?;
    let target = calendars
        .iter()
        .find(|c| c.allows_modifications)
        .or_else(|| calendars.first())
        .ok_or(BoardError::NoCalendar)?;

    let id = device.create_entry(&target.id, entry).await?;
    info!("Added {:?} to calendar {}", entry.title, target.title);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{Datelike, Timelike, Utc, Weekday};

    use super::*;
    use crate::schedule::WEEKLY_SCHEDULE;

    #[test]
    fn dial_uri_keeps_digits_only() {
        assert_eq!(
            dial_uri("(99) 99999-9999").as_deref(),
            Some("tel:99999999999")
        );
        assert_eq!(dial_uri("n/a"), None);
    }

    #[test]
    fn instagram_handle_loses_the_at_sign() {
        assert_eq!(
            instagram_url("@pibdocordeiro").unwrap().as_str(),
            "https://instagram.com/pibdocordeiro"
        );
    }

    #[test]
    fn waze_query_is_encoded() {
        let url = waze_url("R. Sete de Setembro, 451, São João dos Patos - MA").unwrap();
        assert_eq!(url.host_str(), Some("waze.com"));
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "q");
        assert_eq!(value, "R. Sete de Setembro, 451, São João dos Patos - MA");
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn placeholder_media_links_are_not_opened() {
        assert_eq!(
            media_link("https://drive.google.com/drive/folders/VIDEOS_FOLDER_ID").unwrap(),
            MediaLink::NotConfigured
        );
        assert_eq!(media_link("").unwrap(), MediaLink::NotConfigured);
        assert!(matches!(
            media_link("https://drive.google.com/drive/folders/abc123").unwrap(),
            MediaLink::Ready(_)
        ));
        assert!(matches!(media_link("not a url"), Err(BoardError::Url(_))));
    }

    #[test]
    fn service_entry_lasts_two_hours_at_the_venue() {
        let venue = Venue::default();
        let sunday = &WEEKLY_SCHEDULE[0];
        // 2024-03-13 is a Wednesday; next Sunday is the 17th.
        let today = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();

        let entry =
            CalendarEntry::for_service(sunday, &sunday.services[1], today, &venue, Duration::hours(2))
                .unwrap();

        assert_eq!(entry.title, "Culto de Domingo");
        assert_eq!(entry.start.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 17).unwrap());
        assert_eq!(entry.start.date_naive().weekday(), Weekday::Sun);
        assert_eq!((entry.start.hour(), entry.start.minute()), (19, 30));
        assert_eq!(entry.end - entry.start, Duration::hours(2));
        assert_eq!(entry.start.with_timezone(&Utc).hour(), 22);
        assert_eq!(entry.timezone, "America/Fortaleza");
        assert_eq!(entry.location, venue.address);
    }

    #[test]
    fn event_entry_uses_local_start_time() {
        let venue = Venue::default();
        let event = Event {
            id: "e1".to_string(),
            title: "Vigília".to_string(),
            description: "Noite de oração".to_string(),
            date: "2024-03-20T12:00:00Z".parse().unwrap(),
            time: "21:00".to_string(),
            location: "Igreja PIB do Cordeiro".to_string(),
            kind: "evento".to_string(),
        };
        let entry = CalendarEntry::for_event(&event, &venue, Duration::hours(2));
        assert_eq!((entry.start.hour(), entry.start.minute()), (21, 0));
        assert_eq!(entry.start.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        assert_eq!(entry.end.hour(), 23);
    }

    #[derive(Default)]
    struct FakeCalendar {
        denied: bool,
        calendars: Vec<DeviceCalendar>,
        created: Mutex<Vec<(String, CalendarEntry)>>,
    }

    #[async_trait]
    impl CalendarDevice for FakeCalendar {
        async fn request_permission(&self) -> bool {
            !self.denied
        }

        async fn calendars(&self) -> Result<Vec<DeviceCalendar>> {
            Ok(self.calendars.clone())
        }

        async fn create_entry(&self, calendar_id: &str, entry: &CalendarEntry) -> Result<String> {
            let mut created = self.created.lock().unwrap();
            created.push((calendar_id.to_string(), entry.clone()));
            Ok(format!("entry-{}", created.len()))
        }
    }

    fn calendar(id: &str, writable: bool) -> DeviceCalendar {
        DeviceCalendar {
            id: id.to_string(),
            title: id.to_uppercase(),
            allows_modifications: writable,
        }
    }

    fn sample_entry() -> CalendarEntry {
        let sunday = &WEEKLY_SCHEDULE[0];
        CalendarEntry::for_service(
            sunday,
            &sunday.services[0],
            NaiveDate::from_ymd_opt(2024, 3, 13).unwrap(),
            &Venue::default(),
            Duration::hours(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn denied_permission_creates_nothing() {
        let device = FakeCalendar {
            denied: true,
            calendars: vec![calendar("home", true)],
            ..FakeCalendar::default()
        };
        let err = add_to_calendar(&device, &sample_entry()).await.unwrap_err();
        assert!(matches!(err, BoardError::CalendarPermission));
        assert!(device.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn prefers_a_writable_calendar() {
        let device = FakeCalendar {
            calendars: vec![calendar("holidays", false), calendar("home", true)],
            ..FakeCalendar::default()
        };
        let id = add_to_calendar(&device, &sample_entry()).await.unwrap();
        assert_eq!(id, "entry-1");
        assert_eq!(device.created.lock().unwrap()[0].0, "home");
    }

    #[tokio::test]
    async fn falls_back_to_first_calendar_or_fails() {
        let read_only = FakeCalendar {
            calendars: vec![calendar("holidays", false)],
            ..FakeCalendar::default()
        };
        add_to_calendar(&read_only, &sample_entry()).await.unwrap();
        assert_eq!(read_only.created.lock().unwrap()[0].0, "holidays");

        let none = FakeCalendar::default();
        let err = add_to_calendar(&none, &sample_entry()).await.unwrap_err();
        assert!(matches!(err, BoardError::NoCalendar));
    }
}
