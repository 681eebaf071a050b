// Copyright (c) 2026 rezky_nightky

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

pub const LOVE_MESSAGES: [&str; 4] = [
    "Chaque seconde nous rapproche ♥",
    "Encore un câlin de plus bientôt",
    "La distance n’arrête pas l’amour ✈ ♥",
    "Nos deux fuseaux, un seul cœur",
];

pub const QUOTES: [&str; 10] = [
    "Loin des yeux, près du cœur.",
    "Le temps passe, l'amour reste.",
    "Chaque jour nous rapproche.",
    "Nos minutes comptent double.",
    "Nos deux étoiles brillent ensemble.",
    "Ton absence écrit mon manque.",
    "Je trace ta main dans le ciel.",
    "Notre horizon se rejoint.",
    "Le cœur connaît le chemin.",
    "Bientôt: toi et moi, ici.",
];

pub const QUOTE_ZONE: Tz = chrono_tz::Europe::Zurich;

#[derive(Clone, Debug, Default)]
pub struct MessageRotator {
    index: usize,
}

impl MessageRotator {
    pub fn next_message(&mut self) -> &'static str {
        let msg = LOVE_MESSAGES[self.index % LOVE_MESSAGES.len()];
        self.index = self.index.wrapping_add(1);
        msg
    }
}

pub fn daily_quote(now: DateTime<Utc>) -> &'static str {
    let today = now.with_timezone(&QUOTE_ZONE);
    let idx = (today.ordinal() as i64 + today.year() as i64).rem_euclid(QUOTES.len() as i64);
    QUOTES[idx as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotator_wraps_around() {
        let mut r = MessageRotator::default();
        let first = r.next_message();
        for _ in 1..LOVE_MESSAGES.len() {
            r.next_message();
        }
        assert_eq!(r.next_message(), first);
    }

    #[test]
    fn daily_quote_follows_zurich_calendar() {
        // 2025-12-20 is day 354: (354 + 2025) % 10 == 9.
        let evening = DateTime::parse_from_rfc3339("2025-12-20T21:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(daily_quote(evening), QUOTES[9]);

        // 23:30 UTC is already the 21st in Zurich.
        let late = DateTime::parse_from_rfc3339("2025-12-20T23:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(daily_quote(late), QUOTES[0]);
    }
}
