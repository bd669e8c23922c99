pub mod phase_a_github_request;
pub mod phase_a_github_route;
