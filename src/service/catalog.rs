use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;
use tonic::{Code, Request, Response, Status, Streaming};
use tracing::{debug, info};
use uuid::Uuid;

use super::streaming::CancelOnDrop;
use crate::auth::{methods, AuthInterceptor};
use crate::proto::laptop_service_server::LaptopService;
use crate::proto::{
    upload_image_request, CreateLaptopRequest, CreateLaptopResponse, RateLaptopRequest,
    RateLaptopResponse, SearchLaptopRequest, SearchLaptopResponse, UploadImageRequest,
    UploadImageResponse,
};
use crate::store::{DiskImageStore, LaptopStore, RatingStore};
use crate::Error;

/// Largest accepted image payload, in bytes (1 MiB).
pub const MAX_IMAGE_SIZE: usize = 1 << 20;

/// gRPC handlers for the laptop catalog.
///
/// Every handler passes the authorization gate before touching a store.
pub struct CatalogService {
    laptop_store: LaptopStore,
    image_store: DiskImageStore,
    rating_store: RatingStore,
    interceptor: Arc<AuthInterceptor>,
}

impl CatalogService {
    /// Creates the service over its stores and authorization gate.
    pub fn new(
        laptop_store: LaptopStore,
        image_store: DiskImageStore,
        rating_store: RatingStore,
        interceptor: Arc<AuthInterceptor>,
    ) -> Self {
        Self {
            laptop_store,
            image_store,
            rating_store,
            interceptor,
        }
    }
}

/// Receive failures keep their cancellation and deadline codes; anything
/// else collapses to an unknown-status error.
fn recv_error(context: &str, status: Status) -> Status {
    match status.code() {
        Code::Cancelled | Code::DeadlineExceeded => status,
        _ => Status::unknown(format!("{context}: {status}")),
    }
}

#[tonic::async_trait]
impl LaptopService for CatalogService {
    async fn create_laptop(
        &self,
        request: Request<CreateLaptopRequest>,
    ) -> Result<Response<CreateLaptopResponse>, Status> {
        self.interceptor
            .authorize(methods::CREATE_LAPTOP, request.metadata())?;

        let mut laptop = request
            .into_inner()
            .laptop
            .ok_or_else(|| Status::invalid_argument("laptop is not provided"))?;
        info!(id = %laptop.id, "received a create-laptop request");

        if laptop.id.is_empty() {
            laptop.id = Uuid::new_v4().to_string();
        } else if let Err(e) = Uuid::parse_str(&laptop.id) {
            return Err(Status::invalid_argument(format!(
                "laptop ID is not a valid UUID: {e}"
            )));
        }

        self.laptop_store.save(&laptop).await.map_err(|e| {
            let message = format!("cannot save laptop to the store: {e}");
            match e {
                Error::AlreadyExists => Status::already_exists(message),
                _ => Status::internal(message),
            }
        })?;

        info!(id = %laptop.id, "saved laptop");
        Ok(Response::new(CreateLaptopResponse { id: laptop.id }))
    }

    type SearchLaptopStream =
        CancelOnDrop<UnboundedReceiverStream<Result<SearchLaptopResponse, Status>>>;

    async fn search_laptop(
        &self,
        request: Request<SearchLaptopRequest>,
    ) -> Result<Response<Self::SearchLaptopStream>, Status> {
        self.interceptor
            .authorize(methods::SEARCH_LAPTOP, request.metadata())?;

        let filter = request
            .into_inner()
            .filter
            .ok_or_else(|| Status::invalid_argument("filter is not provided"))?;
        info!(?filter, "received a search-laptop request");

        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let guard = cancel.clone().drop_guard();
        let store = self.laptop_store.clone();

        tokio::spawn(async move {
            let result = store
                .search(&cancel, &filter, |laptop| {
                    let id = laptop.id.clone();
                    tx.send(Ok(SearchLaptopResponse {
                        laptop: Some(laptop),
                    }))
                    .map_err(|_| Error::Canceled)?;
                    debug!(%id, "sent matching laptop");
                    Ok(())
                })
                .await;

            match result {
                Ok(()) => {}
                Err(Error::Canceled) => {
                    let _ = tx.send(Err(Status::cancelled("search was canceled")));
                }
                Err(e) => {
                    let _ = tx.send(Err(Status::internal(format!("unexpected error: {e}"))));
                }
            }
        });

        Ok(Response::new(CancelOnDrop::new(
            UnboundedReceiverStream::new(rx),
            guard,
        )))
    }

    async fn upload_image(
        &self,
        request: Request<Streaming<UploadImageRequest>>,
    ) -> Result<Response<UploadImageResponse>, Status> {
        self.interceptor
            .authorize(methods::UPLOAD_IMAGE, request.metadata())?;

        let mut stream = request.into_inner();

        let first = stream
            .message()
            .await
            .map_err(|e| recv_error("cannot receive image info", e))?
            .ok_or_else(|| Status::unknown("image info is not provided"))?;
        let info = match first.data {
            Some(upload_image_request::Data::Info(info)) => info,
            _ => return Err(Status::unknown("first message must carry image info")),
        };
        info!(laptop_id = %info.laptop_id, image_type = %info.image_type, "received an upload-image request");

        if self.laptop_store.find(&info.laptop_id).await.is_none() {
            return Err(Status::internal(format!(
                "laptop {} does not exist",
                info.laptop_id
            )));
        }

        let mut image_data = Vec::new();
        loop {
            let Some(req) = stream
                .message()
                .await
                .map_err(|e| recv_error("cannot receive data chunk", e))?
            else {
                break;
            };

            let chunk = match req.data {
                Some(upload_image_request::Data::ChunkData(chunk)) => chunk,
                _ => return Err(Status::unknown("expected a binary data chunk")),
            };
            debug!(size = chunk.len(), "received chunk of data");

            image_data.extend_from_slice(&chunk);
            if image_data.len() > MAX_IMAGE_SIZE {
                return Err(Status::invalid_argument(format!(
                    "image size is too large: {} > {}",
                    image_data.len(),
                    MAX_IMAGE_SIZE
                )));
            }
        }

        let size = image_data.len();
        let id = self
            .image_store
            .save(&info.laptop_id, &info.image_type, &image_data)
            .await
            .map_err(|e| Status::internal(format!("cannot save image to the store: {e}")))?;

        info!(%id, size, "image saved");
        Ok(Response::new(UploadImageResponse {
            id,
            size: size as u32,
        }))
    }

    type RateLaptopStream =
        CancelOnDrop<UnboundedReceiverStream<Result<RateLaptopResponse, Status>>>;

    async fn rate_laptop(
        &self,
        request: Request<Streaming<RateLaptopRequest>>,
    ) -> Result<Response<Self::RateLaptopStream>, Status> {
        self.interceptor
            .authorize(methods::RATE_LAPTOP, request.metadata())?;

        let mut stream = request.into_inner();
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let guard = cancel.clone().drop_guard();
        let laptop_store = self.laptop_store.clone();
        let rating_store = self.rating_store.clone();

        // One message in flight at a time: response i is emitted before
        // request i + 1 is read.
        tokio::spawn(async move {
            loop {
                let message = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        let _ = tx.send(Err(Status::cancelled("rate-laptop stream was canceled")));
                        return;
                    }
                    message = stream.message() => message,
                };

                let req = match message {
                    Ok(Some(req)) => req,
                    Ok(None) => return,
                    Err(e) => {
                        let _ = tx.send(Err(recv_error("cannot receive rate-laptop request", e)));
                        return;
                    }
                };
                info!(laptop_id = %req.laptop_id, score = req.score, "received a rate-laptop request");

                if laptop_store.find(&req.laptop_id).await.is_none() {
                    let _ = tx.send(Err(Status::not_found(format!(
                        "laptop {} not found",
                        req.laptop_id
                    ))));
                    return;
                }

                let rating = rating_store.add(&req.laptop_id, req.score).await;
                let response = RateLaptopResponse {
                    laptop_id: req.laptop_id,
                    rated_count: rating.count,
                    average_score: rating.sum / f64::from(rating.count),
                };

                if tx.send(Ok(response)).is_err() {
                    return;
                }
            }
        });

        Ok(Response::new(CancelOnDrop::new(
            UnboundedReceiverStream::new(rx),
            guard,
        )))
    }
}
