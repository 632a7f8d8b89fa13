//! Movie catalogue routes and models.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{HttpClient, HyperClient, JSON_CONTENT_TYPE, Method, Parameters, Pipeline, Result, Route};

/// Endpoints of the movie catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieRoute {
    /// `GET /movie/popular?page={page}`
    Popular {
        /// 1-based page number.
        page: u32,
    },
    /// `GET /movie/{id}`
    Detail {
        /// Movie identifier.
        id: u64,
    },
}

impl Route for MovieRoute {
    fn path(&self) -> Cow<'_, str> {
        match self {
            Self::Popular { .. } => Cow::Borrowed("/movie/popular"),
            Self::Detail { id } => Cow::Owned(format!("/movie/{id}")),
        }
    }

    fn method(&self) -> Method {
        Method::Get
    }

    fn parameters(&self) -> Option<Parameters> {
        match self {
            Self::Popular { page } => Some(Parameters::new().with("page", *page)),
            Self::Detail { .. } => None,
        }
    }

    fn headers(&self) -> HashMap<String, String> {
        HashMap::from([
            ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
            ("Accept".to_string(), JSON_CONTENT_TYPE.to_string()),
        ])
    }
}

/// A movie as returned by the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Catalogue identifier.
    pub id: u64,
    /// Display title.
    pub title: String,
    /// Plot summary.
    pub overview: String,
    /// Poster image path, relative to the image host.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Release date as `YYYY-MM-DD`.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Average user rating out of 10.
    #[serde(default)]
    pub vote_average: Option<f64>,
}

/// One page of movies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieList {
    /// 1-based page number.
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<Movie>,
    /// Number of pages available.
    pub total_pages: u32,
    /// Number of movies across all pages.
    pub total_results: u32,
}

/// Popular movies page, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PopularMovies {
    /// Movies on this page.
    pub movies: Vec<Movie>,
    /// Number of pages available.
    pub total_pages: u32,
    /// Page these movies come from.
    pub current_page: u32,
}

impl From<MovieList> for PopularMovies {
    fn from(list: MovieList) -> Self {
        Self {
            movies: list.results,
            total_pages: list.total_pages,
            current_page: list.page,
        }
    }
}

/// Movie catalogue client.
///
/// # Example
///
/// ```ignore
/// use reel::{Pipeline, movie::MovieApi};
///
/// let api = MovieApi::new(
///     Pipeline::builder()
///         .base_url("https://api.themoviedb.org/3".parse()?)
///         .build(),
/// );
/// let popular = api.popular_movies(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MovieApi<C = HyperClient> {
    pipeline: Pipeline<C>,
}

impl<C: HttpClient> MovieApi<C> {
    /// Create a client over the given pipeline.
    #[must_use]
    pub const fn new(pipeline: Pipeline<C>) -> Self {
        Self { pipeline }
    }

    /// Fetch one page of popular movies.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](crate::ApiError) of the failed call.
    pub async fn popular_movies(&self, page: u32) -> Result<PopularMovies> {
        let list: MovieList = self
            .pipeline
            .send(&MovieRoute::Popular { page }, None)
            .await?;
        Ok(list.into())
    }

    /// Fetch the details of one movie.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](crate::ApiError) of the failed call.
    pub async fn movie_detail(&self, id: u64) -> Result<Movie> {
        self.pipeline.send(&MovieRoute::Detail { id }, None).await
    }
}
