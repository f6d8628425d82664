//! Domain model for class metadata: teachers, health schedule and weekly menu.
use chrono::NaiveDate;
use uuid::Uuid;

/// The five school days that carry a menu slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchoolDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl SchoolDay {
    pub const ALL: [SchoolDay; 5] = [
        SchoolDay::Monday,
        SchoolDay::Tuesday,
        SchoolDay::Wednesday,
        SchoolDay::Thursday,
        SchoolDay::Friday,
    ];

    /// Stable slot id used in data files and URLs
    pub fn id(&self) -> &'static str {
        match self {
            SchoolDay::Monday => "monday",
            SchoolDay::Tuesday => "tuesday",
            SchoolDay::Wednesday => "wednesday",
            SchoolDay::Thursday => "thursday",
            SchoolDay::Friday => "friday",
        }
    }

    pub fn day_name(&self) -> &'static str {
        match self {
            SchoolDay::Monday => "Monday",
            SchoolDay::Tuesday => "Tuesday",
            SchoolDay::Wednesday => "Wednesday",
            SchoolDay::Thursday => "Thursday",
            SchoolDay::Friday => "Friday",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|day| day.id() == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuSlot {
    pub day: SchoolDay,
    pub meals: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthEvent {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
}

impl HealthEvent {
    pub fn generate_id() -> String {
        format!("event::{}", Uuid::new_v4())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    pub class_name: String,
    pub teachers: [String; 2],
    pub schedule: Vec<HealthEvent>,
    pub menu: Vec<MenuSlot>,
}

impl ClassInfo {
    /// New class with an empty schedule and one empty menu slot per school day
    pub fn new(class_name: impl Into<String>, teachers: [String; 2]) -> Self {
        Self {
            class_name: class_name.into(),
            teachers,
            schedule: Vec::new(),
            menu: SchoolDay::ALL
                .into_iter()
                .map(|day| MenuSlot { day, meals: String::new() })
                .collect(),
        }
    }

    /// Schedule ordered by ascending date; ties keep their stored order
    pub fn sorted_schedule(&self) -> Vec<HealthEvent> {
        let mut events = self.schedule.clone();
        events.sort_by_key(|e| e.date);
        events
    }

    /// Earliest event on or after `today`
    pub fn next_event(&self, today: NaiveDate) -> Option<&HealthEvent> {
        self.schedule
            .iter()
            .filter(|e| e.date >= today)
            .min_by_key(|e| e.date)
    }

    pub fn menu_slot(&self, day: SchoolDay) -> Option<&MenuSlot> {
        self.menu.iter().find(|slot| slot.day == day)
    }

    /// Replace the meal text for one day. Returns false when the slot is missing.
    pub fn set_meals(&mut self, day: SchoolDay, meals: impl Into<String>) -> bool {
        match self.menu.iter_mut().find(|slot| slot.day == day) {
            Some(slot) => {
                slot.meals = meals.into();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn event(d: &str, title: &str) -> HealthEvent {
        HealthEvent {
            id: HealthEvent::generate_id(),
            date: date(d),
            title: title.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_new_class_has_five_empty_menu_slots() {
        let info = ClassInfo::new("Leaf 1", ["Mai".to_string(), "Anh".to_string()]);

        assert_eq!(info.teachers.len(), 2);
        assert_eq!(info.menu.len(), 5);
        let days: Vec<_> = info.menu.iter().map(|slot| slot.day).collect();
        assert_eq!(days, SchoolDay::ALL.to_vec());
        assert!(info.menu.iter().all(|slot| slot.meals.is_empty()));
        assert!(info.schedule.is_empty());
    }

    #[test]
    fn test_schedule_sorted_and_next_event() {
        let mut info = ClassInfo::new("Leaf 1", ["Mai".to_string(), "Anh".to_string()]);
        info.schedule.push(event("2024-05-20", "Dental check"));
        info.schedule.push(event("2024-03-01", "Vaccination"));
        info.schedule.push(event("2024-04-11", "Eye exam"));

        let titles: Vec<_> = info.sorted_schedule().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Vaccination", "Eye exam", "Dental check"]);

        assert_eq!(info.next_event(date("2024-03-02")).unwrap().title, "Eye exam");
        assert_eq!(info.next_event(date("2024-05-20")).unwrap().title, "Dental check");
        assert!(info.next_event(date("2024-06-01")).is_none());
    }

    #[test]
    fn test_set_meals() {
        let mut info = ClassInfo::new("Leaf 1", ["Mai".to_string(), "Anh".to_string()]);
        assert!(info.set_meals(SchoolDay::Wednesday, "Rice, fish soup"));
        assert_eq!(info.menu_slot(SchoolDay::Wednesday).unwrap().meals, "Rice, fish soup");

        info.menu.retain(|slot| slot.day != SchoolDay::Friday);
        assert!(!info.set_meals(SchoolDay::Friday, "Noodles"));
    }

    #[test]
    fn test_school_day_ids() {
        assert_eq!(SchoolDay::from_id("Thursday"), Some(SchoolDay::Thursday));
        assert_eq!(SchoolDay::from_id("saturday"), None);
    }
}
