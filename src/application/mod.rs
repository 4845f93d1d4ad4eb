pub mod bootstrap;
pub mod capture;
pub mod indoor;
pub mod outdoor;
pub mod scheduler;
