use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};

use super::dto::{
    ActiveRoute, AnomalyReport, ApiResponse, LiveVehicle, NodeEnvelope, NodeInfo, ProgressUpdate,
    RealPathRow, RecalculationRequest, RecalculationResponse, RouteMetadata, UserEnvelope,
    VehicleContext,
};
use super::{ClientError, RouteBackend};

/// [`RouteBackend`] over HTTP with a bearer token on every request.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<HttpBackend, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::BuildError(e.to_string()))?;
        Ok(HttpBackend {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> Result<(String, RequestBuilder), ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        let url = self.url(path);
        let builder = self.client.request(method, &url).bearer_auth(token);
        Ok((url, builder))
    }

    async fn send(url: &str, builder: RequestBuilder) -> Result<Response, ClientError> {
        log::debug!("{url}");
        builder.send().await.map_err(|source| ClientError::RequestError {
            url: url.to_string(),
            source,
        })
    }

    async fn body(url: &str, response: Response) -> Result<(u16, String), ClientError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|source| ClientError::RequestError {
                url: url.to_string(),
                source,
            })?;
        Ok((status, body))
    }

    /// sends a request and decodes a successful JSON response.
    async fn fetch<T, B>(&self, method: Method, path: &str, payload: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let (url, mut builder) = self.request(method, path)?;
        if let Some(p) = payload {
            builder = builder.json(p);
        }
        let response = HttpBackend::send(&url, builder).await?;
        let (status, body) = HttpBackend::body(&url, response).await?;
        if !(200..300).contains(&status) {
            return Err(ClientError::UnexpectedStatus { url, status, body });
        }
        decode(&url, &body)
    }

    /// sends a request whose response body is ignored.
    async fn execute<B>(&self, method: Method, path: &str, payload: Option<&B>) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let (url, mut builder) = self.request(method, path)?;
        if let Some(p) = payload {
            builder = builder.json(p);
        }
        let response = HttpBackend::send(&url, builder).await?;
        let (status, body) = HttpBackend::body(&url, response).await?;
        if !(200..300).contains(&status) {
            return Err(ClientError::UnexpectedStatus { url, status, body });
        }
        Ok(())
    }

    /// sends a command that answers with a `{code, message}` envelope. the
    /// http status replaces the code when it is not a success.
    async fn command<B>(&self, path: &str, payload: Option<&B>) -> Result<ApiResponse, ClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let (url, mut builder) = self.request(Method::POST, path)?;
        if let Some(p) = payload {
            builder = builder.json(p);
        }
        let response = HttpBackend::send(&url, builder).await?;
        let (status, body) = HttpBackend::body(&url, response).await?;
        let mut envelope: ApiResponse = if body.trim().is_empty() {
            ApiResponse::default()
        } else {
            match serde_json::from_str(&body) {
                Ok(envelope) => envelope,
                Err(_) if !(200..300).contains(&status) => ApiResponse {
                    code: None,
                    message: Some(body),
                },
                Err(e) => {
                    return Err(ClientError::DecodeError {
                        url,
                        message: e.to_string(),
                    })
                }
            }
        };
        if !(200..300).contains(&status) {
            envelope.code = Some(i64::from(status));
        }
        Ok(envelope)
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::DecodeError {
        url: url.to_string(),
        message: e.to_string(),
    })
}

const NO_BODY: Option<&()> = None;

#[async_trait]
impl RouteBackend for HttpBackend {
    async fn active_route(&self, user_id: &str) -> Result<Option<ActiveRoute>, ClientError> {
        let path = format!("/vehicle-routes/from/{user_id}/active");
        match self.fetch(Method::GET, &path, NO_BODY).await {
            Ok(route) => Ok(Some(route)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn route_metadata(&self, route_id: &str) -> Result<RouteMetadata, ClientError> {
        self.fetch(Method::GET, &format!("/vehicle-routes/{route_id}"), NO_BODY)
            .await
    }

    async fn real_path(&self, route_id: &str) -> Result<Vec<RealPathRow>, ClientError> {
        let rows: Option<Vec<RealPathRow>> = self
            .fetch(
                Method::GET,
                &format!("/vehicle-routes/{route_id}/realpath"),
                NO_BODY,
            )
            .await?;
        Ok(rows.unwrap_or_default())
    }

    async fn node(&self, node_id: &str) -> Result<NodeInfo, ClientError> {
        let envelope: NodeEnvelope = self
            .fetch(Method::GET, &format!("/nodes/{node_id}"), NO_BODY)
            .await?;
        Ok(envelope.into_node())
    }

    async fn driver_status(&self, user_id: &str) -> Result<Option<String>, ClientError> {
        let envelope: UserEnvelope = self
            .fetch(Method::GET, &format!("/users/{user_id}"), NO_BODY)
            .await?;
        Ok(envelope.status())
    }

    async fn update_progress(
        &self,
        route_id: &str,
        segment_index: usize,
    ) -> Result<(), ClientError> {
        let body = ProgressUpdate {
            current_segment_index: segment_index,
        };
        self.execute(
            Method::PATCH,
            &format!("/vehicle-routes/{route_id}/update-progress"),
            Some(&body),
        )
        .await
    }

    async fn complete_route(&self, route_id: &str) -> Result<ApiResponse, ClientError> {
        self.command(&format!("/routes/{route_id}/complete"), NO_BODY)
            .await
    }

    async fn recalculate_route(
        &self,
        request: &RecalculationRequest,
    ) -> Result<RecalculationResponse, ClientError> {
        self.fetch(Method::POST, "/routes/recalculate-route", Some(request))
            .await
    }

    async fn report_anomaly(&self, report: &AnomalyReport) -> Result<ApiResponse, ClientError> {
        self.command("/routes/report-anomaly", Some(report)).await
    }

    async fn mark_delivered(&self, order_id: &str) -> Result<(), ClientError> {
        self.execute(
            Method::PATCH,
            &format!("/orders/{order_id}/mark-delivered"),
            NO_BODY,
        )
        .await
    }

    async fn mark_picked_up(&self, order_id: &str) -> Result<(), ClientError> {
        self.execute(
            Method::PATCH,
            &format!("/orders/{order_id}/status?status=PICKED_UP"),
            NO_BODY,
        )
        .await
    }

    async fn live_vehicles(&self) -> Result<Vec<LiveVehicle>, ClientError> {
        self.fetch(Method::GET, "/admin/vehicles/live", NO_BODY)
            .await
    }

    async fn vehicle_context(&self, vehicle_id: &str) -> Result<VehicleContext, ClientError> {
        self.fetch(
            Method::GET,
            &format!("/admin/vehicles/{vehicle_id}/context"),
            NO_BODY,
        )
        .await
    }
}
