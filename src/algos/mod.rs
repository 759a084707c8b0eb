pub use self::algo::{Algo, Phase, Round};
pub use self::greedy::Greedy;
pub use self::priority::PriorityGreedy;

mod algo;
mod greedy;
mod priority;
