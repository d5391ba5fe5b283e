mod app;
mod cli;
mod report;
mod runner;
mod suite;

fn main() {
    app::run();
}
