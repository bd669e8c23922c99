pub mod phase_a_request;
pub mod phase_a_route;
