pub mod plan_render;

pub use plan_render::{render_plan, render_summary};
