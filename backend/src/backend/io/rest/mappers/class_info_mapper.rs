//! backend/src/backend/io/rest/mappers/class_info_mapper.rs

use crate::backend::domain::metrics::{format_iso_date, parse_iso_date};
use crate::backend::domain::models::{
    ClassInfo as DomainClassInfo, HealthEvent as DomainHealthEvent, MenuSlot, SchoolDay,
    ValidationError,
};
use shared::{
    ClassInfo as SharedClassInfo, ClassInfoResponse, HealthEvent as SharedHealthEvent, MenuItem,
    Teacher,
};

/// Mapper to convert between shared ClassInfo DTOs and the domain ClassInfo model.
pub struct ClassInfoMapper;

impl ClassInfoMapper {
    /// Converts a shared ClassInfo DTO to a domain model, enforcing the two-teacher rule.
    pub fn to_domain(dto: SharedClassInfo) -> Result<DomainClassInfo, ValidationError> {
        let teachers: [String; 2] = dto
            .teachers
            .into_iter()
            .map(|t| t.name)
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| ValidationError::TeacherCount)?;

        let schedule = dto
            .health_schedule
            .into_iter()
            .map(Self::event_to_domain)
            .collect::<Result<Vec<_>, _>>()?;

        let menu = dto
            .menu
            .into_iter()
            .map(|item| {
                SchoolDay::from_id(&item.id)
                    .map(|day| MenuSlot { day, meals: item.meals })
                    .ok_or(ValidationError::UnknownSchoolDay(item.id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DomainClassInfo {
            class_name: dto.class_name,
            teachers,
            schedule,
            menu,
        })
    }

    /// Converts a domain ClassInfo model to a shared ClassInfo DTO.
    pub fn to_dto(domain: DomainClassInfo) -> SharedClassInfo {
        SharedClassInfo {
            class_name: domain.class_name,
            teachers: domain
                .teachers
                .into_iter()
                .map(|name| Teacher { name })
                .collect(),
            health_schedule: domain
                .schedule
                .into_iter()
                .map(Self::event_to_dto)
                .collect(),
            menu: domain
                .menu
                .into_iter()
                .map(|slot| MenuItem {
                    id: slot.day.id().to_string(),
                    day: slot.day.day_name().to_string(),
                    meals: slot.meals,
                })
                .collect(),
        }
    }

    pub fn event_to_domain(dto: SharedHealthEvent) -> Result<DomainHealthEvent, ValidationError> {
        let date = parse_iso_date(&dto.date).ok_or(ValidationError::InvalidDate(dto.date))?;
        Ok(DomainHealthEvent {
            id: dto.id,
            date,
            title: dto.title,
            description: dto.description,
        })
    }

    pub fn event_to_dto(domain: DomainHealthEvent) -> SharedHealthEvent {
        SharedHealthEvent {
            id: domain.id,
            date: format_iso_date(domain.date),
            title: domain.title,
            description: domain.description,
        }
    }

    pub fn to_class_info_response_dto(domain: DomainClassInfo, message: &str) -> ClassInfoResponse {
        ClassInfoResponse {
            class_info: Self::to_dto(domain),
            success_message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_info(teacher_count: usize) -> SharedClassInfo {
        SharedClassInfo {
            class_name: "Leaf 1".to_string(),
            teachers: (0..teacher_count)
                .map(|i| Teacher { name: format!("Teacher {}", i + 1) })
                .collect(),
            health_schedule: vec![SharedHealthEvent {
                id: "event::1".to_string(),
                date: "2024-09-15".to_string(),
                title: "Height check".to_string(),
                description: String::new(),
            }],
            menu: vec![MenuItem {
                id: "monday".to_string(),
                day: "Thứ Hai".to_string(),
                meals: "Rice".to_string(),
            }],
        }
    }

    #[test]
    fn test_to_domain_requires_two_teachers() {
        assert_eq!(
            ClassInfoMapper::to_domain(shared_info(1)),
            Err(ValidationError::TeacherCount)
        );
        assert_eq!(
            ClassInfoMapper::to_domain(shared_info(3)),
            Err(ValidationError::TeacherCount)
        );
        let info = ClassInfoMapper::to_domain(shared_info(2)).unwrap();
        assert_eq!(info.teachers[1], "Teacher 2");
        assert_eq!(info.menu[0].day, SchoolDay::Monday);
    }

    #[test]
    fn test_to_dto_uses_stable_day_ids() {
        let domain = DomainClassInfo::new("Leaf 1", ["A".to_string(), "B".to_string()]);
        let dto = ClassInfoMapper::to_dto(domain);
        let ids: Vec<_> = dto.menu.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["monday", "tuesday", "wednesday", "thursday", "friday"]);
        assert_eq!(dto.teachers.len(), 2);
    }

    #[test]
    fn test_event_with_bad_date_is_rejected() {
        let mut dto = shared_info(2);
        dto.health_schedule[0].date = String::new();
        assert_eq!(
            ClassInfoMapper::to_domain(dto),
            Err(ValidationError::InvalidDate(String::new()))
        );
    }
}
