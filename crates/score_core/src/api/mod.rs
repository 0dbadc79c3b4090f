pub mod json_api;
pub mod overlay;

pub use json_api::{
    apply_point_json, apply_side_change_json, create_match_json, error_codes,
    important_point_json, match_schema_json, switch_server_json, toggle_sides_json, PointRequest,
    PointResponse,
};
pub use overlay::{flatten_match, overlay_json};
