pub mod test_geo;
