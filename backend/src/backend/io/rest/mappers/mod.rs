pub mod assessment_mapper;
pub mod class_info_mapper;
pub mod student_mapper;
