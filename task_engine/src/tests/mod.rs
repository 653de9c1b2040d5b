pub mod test_advance;
pub mod test_declaration;
pub mod test_distance;
pub mod test_pev;
pub mod test_settings;
