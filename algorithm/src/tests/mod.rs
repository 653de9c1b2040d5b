pub mod test_dijkstra;
pub mod test_mac_cready;
pub mod test_zero_finder;
