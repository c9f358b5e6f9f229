//! The church's fixed weekly programme.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    pub hour: u32,
    pub minute: u32,
    pub title: &'static str,
    pub description: &'static str,
}

impl Service {
    pub fn start_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
    }

    /// `HH:MM`
    pub fn time_label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDay {
    pub label: &'static str,
    pub weekday: Weekday,
    pub services: &'static [Service],
}

pub static WEEKLY_SCHEDULE: [ScheduleDay; 4] = [
    ScheduleDay {
        label: "Domingo",
        weekday: Weekday::Sun,
        services: &[
            Service {
                hour: 9,
                minute: 0,
                title: "EBD - Escola Bíblica Dominical",
                description: "Estudo bíblico para toda a família",
            },
            Service {
                hour: 19,
                minute: 30,
                title: "Culto de Domingo",
                description: "Culto de adoração e palavra",
            },
        ],
    },
    ScheduleDay {
        label: "Quarta-feira",
        weekday: Weekday::Wed,
        services: &[Service {
            hour: 19,
            minute: 30,
            title: "Culto de Quarta",
            description: "Culto de oração e doutrina",
        }],
    },
    ScheduleDay {
        label: "Sexta-feira",
        weekday: Weekday::Fri,
        services: &[Service {
            hour: 19,
            minute: 30,
            title: "MCM - Mulheres Cristãs em Missão",
            description: "Reunião das mulheres da igreja",
        }],
    },
    ScheduleDay {
        label: "Sábado",
        weekday: Weekday::Sat,
        services: &[
            Service {
                hour: 15,
                minute: 30,
                title: "Mensageiras do Rei",
                description: "Ministério infantil",
            },
            Service {
                hour: 19,
                minute: 30,
                title: "UNIJOVEM e UMHBB",
                description: "Ministérios jovem e masculino",
            },
        ],
    },
];

/// The next date falling on `weekday`, strictly after `today`.
///
/// A service on today's weekday is scheduled for next week.
pub fn next_occurrence(weekday: Weekday, today: NaiveDate) -> NaiveDate {
    let current = i64::from(today.weekday().num_days_from_sunday());
    let target = i64::from(weekday.num_days_from_sunday());
    let mut days = (target - current).rem_euclid(7);
    if days == 0 {
        days = 7;
    }
    today + Duration::days(days)
}
