pub mod secure_route;
