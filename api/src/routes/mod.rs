pub mod health_route;
pub mod phase_a;
pub mod phase_a_github;
