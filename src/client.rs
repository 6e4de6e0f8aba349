//! Typed client wrappers for the catalog and auth services.
//!
//! [`LaptopClient`] attaches its access token as `authorization` metadata on
//! every call, which the server's gate checks for the methods that need it.

use tonic::metadata::MetadataValue;
use tonic::transport::Channel;
use tonic::{Request, Status};

use crate::proto::auth_service_client::AuthServiceClient;
use crate::proto::laptop_service_client::LaptopServiceClient;
use crate::proto::{
    upload_image_request, CreateLaptopRequest, Filter, ImageInfo, Laptop, LoginRequest,
    RateLaptopRequest, RateLaptopResponse, SearchLaptopRequest, UploadImageRequest,
    UploadImageResponse,
};

/// How the upload client slices image data into stream messages.
const UPLOAD_CHUNK_SIZE: usize = 1024;

/// Client for the login endpoint.
pub struct AuthClient {
    service: AuthServiceClient<Channel>,
    username: String,
    password: String,
}

impl AuthClient {
    /// Creates a client holding the credentials to log in with.
    pub fn new(channel: Channel, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            service: AuthServiceClient::new(channel),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Logs in and returns the access token.
    pub async fn login(&mut self) -> Result<String, Status> {
        let request = LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        };

        let response = self.service.login(Request::new(request)).await?;
        Ok(response.into_inner().access_token)
    }
}

/// Client for the laptop catalog.
pub struct LaptopClient {
    service: LaptopServiceClient<Channel>,
    access_token: Option<String>,
}

impl LaptopClient {
    /// Creates a client with no access token; only public methods will pass
    /// the server's gate.
    pub fn new(channel: Channel) -> Self {
        Self {
            service: LaptopServiceClient::new(channel),
            access_token: None,
        }
    }

    /// Creates a client that authenticates every call with the given token.
    pub fn with_access_token(channel: Channel, access_token: impl Into<String>) -> Self {
        Self {
            service: LaptopServiceClient::new(channel),
            access_token: Some(access_token.into()),
        }
    }

    fn request<T>(&self, message: T) -> Result<Request<T>, Status> {
        let mut request = Request::new(message);

        if let Some(token) = &self.access_token {
            let value = MetadataValue::try_from(token.as_str())
                .map_err(|_| Status::invalid_argument("access token is not valid metadata"))?;
            request.metadata_mut().insert("authorization", value);
        }

        Ok(request)
    }

    /// Creates a laptop, returning its final identifier.
    pub async fn create_laptop(&mut self, laptop: Laptop) -> Result<String, Status> {
        let request = self.request(CreateLaptopRequest {
            laptop: Some(laptop),
        })?;

        let response = self.service.create_laptop(request).await?;
        Ok(response.into_inner().id)
    }

    /// Searches the catalog, collecting every streamed match.
    pub async fn search_laptop(&mut self, filter: Filter) -> Result<Vec<Laptop>, Status> {
        let request = self.request(SearchLaptopRequest {
            filter: Some(filter),
        })?;

        let mut stream = self.service.search_laptop(request).await?.into_inner();
        let mut laptops = Vec::new();
        while let Some(response) = stream.message().await? {
            if let Some(laptop) = response.laptop {
                laptops.push(laptop);
            }
        }

        Ok(laptops)
    }

    /// Uploads image data for a laptop as a chunked stream.
    pub async fn upload_image(
        &mut self,
        laptop_id: &str,
        image_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadImageResponse, Status> {
        let mut messages = vec![UploadImageRequest {
            data: Some(upload_image_request::Data::Info(ImageInfo {
                laptop_id: laptop_id.to_string(),
                image_type: image_type.to_string(),
            })),
        }];
        messages.extend(data.chunks(UPLOAD_CHUNK_SIZE).map(|chunk| UploadImageRequest {
            data: Some(upload_image_request::Data::ChunkData(chunk.to_vec())),
        }));

        let request = self.request(tokio_stream::iter(messages))?;
        let response = self.service.upload_image(request).await?;
        Ok(response.into_inner())
    }

    /// Rates a batch of laptops over one bidirectional stream, returning the
    /// per-laptop aggregates in request order.
    pub async fn rate_laptop(
        &mut self,
        laptop_ids: &[String],
        scores: &[f64],
    ) -> Result<Vec<RateLaptopResponse>, Status> {
        let messages: Vec<_> = laptop_ids
            .iter()
            .zip(scores)
            .map(|(laptop_id, score)| RateLaptopRequest {
                laptop_id: laptop_id.clone(),
                score: *score,
            })
            .collect();

        let request = self.request(tokio_stream::iter(messages))?;
        let mut stream = self.service.rate_laptop(request).await?.into_inner();

        let mut responses = Vec::new();
        while let Some(response) = stream.message().await? {
            responses.push(response);
        }

        Ok(responses)
    }
}
