pub mod important_point;

pub use important_point::{
    get_important_point, point_stakes, ImportantPoint, ImportantPointType, PointStakes,
};
