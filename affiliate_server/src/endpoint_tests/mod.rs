mod accounts;
mod auth;
mod dashboard;
mod helpers;
mod payments;
mod server;
