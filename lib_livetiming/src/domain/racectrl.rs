//! Race control notices: flags, safety cars and FIA communications.

/// Broad grouping of a race-control message, used by front ends to decide
/// how prominently to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RaceCtrlCategory {
    /// Track-wide condition: flags, safety car, virtual safety car.
    TrackStatus,
    /// Official FIA communication (DRS changes, stewarding notes).
    Fia,
    #[default]
    Other,
}

pub const TITLE_SAFETY_CAR: &str = "SAFETY\nCAR";
pub const TITLE_VIRTUAL_SAFETY_CAR: &str = "VSC";
pub const TITLE_FLAG_GREEN: &str = "GREEN\nFLAG";
pub const TITLE_FLAG_BLUE: &str = "BLUE\nFLAG";
pub const TITLE_FLAG_YELLOW: &str = "YELLOW\nFLAG";
pub const TITLE_FLAG_DOUBLE_YELLOW: &str = "DOUBLE\nYELLOW";
pub const TITLE_FLAG_RED: &str = "RED\nFLAG";
pub const TITLE_FLAG_BLACK_WHITE: &str = "BLACK\nWHITE";
pub const TITLE_FLAG: &str = "FLAG";
pub const TITLE_FIA: &str = "FIA";
pub const TITLE_RACE_CONTROL: &str = "RACE\nCONTROL";

/// The most recent race-control message. Only the latest message is
/// retained; historical notices are not queued.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceCtrlMsg {
    pub category: RaceCtrlCategory,
    /// Short label for dashboards, e.g. `YELLOW\nFLAG`.
    pub title: String,
    /// The raw message text from race control.
    pub body: String,
}

impl Default for RaceCtrlMsg {
    fn default() -> Self {
        RaceCtrlMsg {
            category: RaceCtrlCategory::Other,
            title: TITLE_RACE_CONTROL.to_string(),
            body: String::new(),
        }
    }
}

impl RaceCtrlMsg {
    /// Categorizes a raw feed message. `category` is the feed's `Category`
    /// field; `flag` and `mode` disambiguate flag and safety-car messages.
    pub fn from_feed(category: &str, flag: Option<&str>, mode: Option<&str>, body: String) -> Self {
        let (category, title) = match category {
            "Flag" => match flag.unwrap_or_default() {
                "CLEAR" | "GREEN" => (RaceCtrlCategory::TrackStatus, TITLE_FLAG_GREEN),
                "BLUE" => (RaceCtrlCategory::TrackStatus, TITLE_FLAG_BLUE),
                "YELLOW" => (RaceCtrlCategory::TrackStatus, TITLE_FLAG_YELLOW),
                "DOUBLE YELLOW" => (RaceCtrlCategory::TrackStatus, TITLE_FLAG_DOUBLE_YELLOW),
                "RED" => (RaceCtrlCategory::TrackStatus, TITLE_FLAG_RED),
                "BLACK AND WHITE" => (RaceCtrlCategory::TrackStatus, TITLE_FLAG_BLACK_WHITE),
                _ => (RaceCtrlCategory::TrackStatus, TITLE_FLAG),
            },
            "SafetyCar" => match mode.unwrap_or_default() {
                "SAFETY CAR" => (RaceCtrlCategory::TrackStatus, TITLE_SAFETY_CAR),
                "VIRTUAL SAFETY CAR" => (RaceCtrlCategory::TrackStatus, TITLE_VIRTUAL_SAFETY_CAR),
                _ => (RaceCtrlCategory::TrackStatus, TITLE_RACE_CONTROL),
            },
            "Drs" => (RaceCtrlCategory::Fia, TITLE_RACE_CONTROL),
            "Other" => (RaceCtrlCategory::Fia, TITLE_FIA),
            _ => (RaceCtrlCategory::Other, TITLE_RACE_CONTROL),
        };

        RaceCtrlMsg {
            category,
            title: title.to_string(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_flag_maps_to_green() {
        let m = RaceCtrlMsg::from_feed("Flag", Some("CLEAR"), None, "TRACK CLEAR".into());
        assert_eq!(m.category, RaceCtrlCategory::TrackStatus);
        assert_eq!(m.title, TITLE_FLAG_GREEN);
        assert_eq!(m.body, "TRACK CLEAR");
    }

    #[test]
    fn flag_titles() {
        let cases = [
            ("GREEN", TITLE_FLAG_GREEN),
            ("BLUE", TITLE_FLAG_BLUE),
            ("YELLOW", TITLE_FLAG_YELLOW),
            ("DOUBLE YELLOW", TITLE_FLAG_DOUBLE_YELLOW),
            ("RED", TITLE_FLAG_RED),
            ("BLACK AND WHITE", TITLE_FLAG_BLACK_WHITE),
        ];
        for (flag, title) in cases {
            let m = RaceCtrlMsg::from_feed("Flag", Some(flag), None, String::new());
            assert_eq!(m.title, title, "flag {flag}");
            assert_eq!(m.category, RaceCtrlCategory::TrackStatus);
        }
    }

    #[test]
    fn safety_car_modes() {
        let sc = RaceCtrlMsg::from_feed("SafetyCar", None, Some("SAFETY CAR"), String::new());
        assert_eq!(sc.title, TITLE_SAFETY_CAR);
        let vsc = RaceCtrlMsg::from_feed("SafetyCar", None, Some("VIRTUAL SAFETY CAR"), String::new());
        assert_eq!(vsc.title, TITLE_VIRTUAL_SAFETY_CAR);
    }

    #[test]
    fn fia_and_fallback_categories() {
        let drs = RaceCtrlMsg::from_feed("Drs", None, None, "DRS ENABLED".into());
        assert_eq!(drs.category, RaceCtrlCategory::Fia);
        assert_eq!(drs.title, TITLE_RACE_CONTROL);

        let other = RaceCtrlMsg::from_feed("Other", None, None, String::new());
        assert_eq!(other.category, RaceCtrlCategory::Fia);
        assert_eq!(other.title, TITLE_FIA);

        let unknown = RaceCtrlMsg::from_feed("CarEvent", None, None, String::new());
        assert_eq!(unknown.category, RaceCtrlCategory::Other);
        assert_eq!(unknown.title, TITLE_RACE_CONTROL);
    }
}
