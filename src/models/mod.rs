pub mod condition;
pub mod target;
pub mod workout;

pub use condition::{Condition, DistanceUnit};
pub use target::{Target, TargetType};
pub use workout::{RepeatedStep, SportType, Step, StepRole, Workout, WorkoutStep};
