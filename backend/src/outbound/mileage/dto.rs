//! DTOs for decoding directions-API responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into the
//! domain [`crate::domain::Miles`] value in one pass.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct RouteResponseDto {
    pub(super) route: Option<RouteDto>,
    pub(super) info: RouteInfoDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct RouteDto {
    /// Distance in fractional miles.
    pub(super) distance: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct RouteInfoDto {
    /// Provider status: zero on success.
    pub(super) statuscode: i32,
    #[serde(default)]
    pub(super) messages: Vec<String>,
}

impl RouteResponseDto {
    /// Extract the reported distance, or explain why the payload is unusable.
    pub(super) fn into_distance(self) -> Result<f64, String> {
        if self.info.statuscode != 0 {
            let detail = if self.info.messages.is_empty() {
                String::new()
            } else {
                format!(": {}", self.info.messages.join("; "))
            };
            return Err(format!(
                "provider status {}{detail}",
                self.info.statuscode
            ));
        }
        let route = self.route.ok_or("response carries no route")?;
        Ok(route.distance)
    }
}
