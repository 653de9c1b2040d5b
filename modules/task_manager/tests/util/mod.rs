pub mod bus_flight;
