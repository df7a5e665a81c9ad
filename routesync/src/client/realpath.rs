use std::collections::HashMap;

use routesync_core::model::{NodeRef, RouteSegment};

use super::dto::{lon_lat_points, RealPathRow};
use super::{ClientError, RouteBackend};

/// label shown for a virtual destination without a `toLabel`.
pub const VIRTUAL_NODE_NAME: &str = "Virtual";

/// loads the drawable segments of a route in traversal order.
///
/// rows with one geometry point or fewer are dropped. destination names of
/// real nodes are looked up once per node; a failed lookup falls back to the
/// node id. virtual nodes are never looked up.
pub async fn load_route_segments<B>(
    backend: &B,
    route_id: &str,
) -> Result<Vec<RouteSegment>, ClientError>
where
    B: RouteBackend + ?Sized,
{
    let rows = backend.real_path(route_id).await?;
    let total = rows.len();
    let mut names: HashMap<String, String> = HashMap::new();
    let mut segments = Vec::with_capacity(total);
    for row in rows.into_iter().filter(RealPathRow::has_path) {
        let to_node = NodeRef::parse(row.to_node_index.as_deref().unwrap_or_default());
        let to_name = destination_name(backend, &row, &to_node, &mut names).await;
        let segment = RouteSegment::new(
            row.id,
            row.from_label.unwrap_or_default(),
            row.to_label.unwrap_or_default(),
            NodeRef::parse(row.from_node_index.as_deref().unwrap_or_default()),
            to_node,
            to_name,
            lon_lat_points(row.geometry.as_deref().unwrap_or_default()),
            row.order_ids,
            row.distance_m.unwrap_or_default(),
            row.time_s.unwrap_or_default(),
        )?;
        segments.push(segment);
    }
    if segments.len() < total {
        log::debug!(
            "route {route_id}: dropped {} segment(s) without a drawable path",
            total - segments.len()
        );
    }
    Ok(segments)
}

async fn destination_name<B>(
    backend: &B,
    row: &RealPathRow,
    node: &NodeRef,
    cache: &mut HashMap<String, String>,
) -> String
where
    B: RouteBackend + ?Sized,
{
    let id = match node.real_id() {
        Some(id) if !id.is_empty() => id,
        _ => {
            return row
                .to_label
                .clone()
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| VIRTUAL_NODE_NAME.to_string())
        }
    };
    if let Some(name) = cache.get(id) {
        return name.clone();
    }
    let name = match backend.node(id).await {
        Ok(info) => info.name.filter(|n| !n.is_empty()),
        Err(e) => {
            log::debug!("node {id} lookup failed: {e}");
            None
        }
    }
    .unwrap_or_else(|| id.to_string());
    cache.insert(id.to_string(), name.clone());
    name
}
