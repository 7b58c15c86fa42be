use serde::Serialize;
use warp::reject;

use crate::errors::TrackerError;

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: TrackerError,
}

impl Rejection {
    pub fn new(context: Context, error: TrackerError) -> Self {
        Rejection { context, error }
    }

    pub fn flatten(&self) -> FlattenedRejection {
        FlattenedRejection {
            context: self.context.clone(),
            message: format!("{}", self.error),
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    #[serde(flatten)]
    pub(crate) context: Context,
    pub(crate) message: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "context", rename_all = "snake_case")]
pub enum Context {
    Annotate { id: String },
    Capture,
    Draft { id: String },
    Retrieve { id: String },
    Save { id: String },
}

impl Context {
    pub fn annotate(id: String) -> Context {
        Context::Annotate { id }
    }

    pub fn capture() -> Context {
        Context::Capture
    }

    pub fn draft(id: String) -> Context {
        Context::Draft { id }
    }

    pub fn retrieve(id: String) -> Context {
        Context::Retrieve { id }
    }

    pub fn save(id: String) -> Context {
        Context::Save { id }
    }
}
