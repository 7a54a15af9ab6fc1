use serde::Serialize;

/// A page payload: the client-side component to mount and its props.
#[derive(Debug, Serialize)]
pub struct Page<P> {
    pub component: &'static str,
    pub props: P,
}

impl<P> Page<P> {
    pub fn new(component: &'static str, props: P) -> Self {
        Self { component, props }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Info,
}

/// Result of a mutation.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: Status,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(message: &'static str, data: T) -> Self {
        Self {
            status: Status::Success,
            message,
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    pub fn done(message: &'static str) -> Self {
        Self {
            status: Status::Success,
            message,
            data: None,
        }
    }

    pub fn info(message: &'static str) -> Self {
        Self {
            status: Status::Info,
            message,
            data: None,
        }
    }
}
