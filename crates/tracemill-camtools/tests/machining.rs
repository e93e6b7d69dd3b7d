#[path = "machining/drills.rs"]
mod drills;
#[path = "machining/programs.rs"]
mod programs;
#[path = "machining/square_scenario.rs"]
mod square_scenario;
