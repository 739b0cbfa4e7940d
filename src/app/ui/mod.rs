mod controls;
mod details;
mod legend;
