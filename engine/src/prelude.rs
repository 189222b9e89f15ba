pub use crate::{
    Action, ActionResult, ActiveFov, Entity, Instant, Map, MapKey, Memory,
    MemoryLayer, MessageLog, PlanResult, Runtime, ScenarioStatus,
    StairDir, Success, TileId, FOV_RADIUS, RETRY_DELAY, TURN_COST,
};
pub use glam::{ivec2, IVec2};
pub use util::{chebyshev_len, Grid, HashMap, HashSet};
