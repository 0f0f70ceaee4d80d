/// Responses that report failure in-band with `success: false` and an
/// `error` string rather than through the HTTP status.
pub trait Envelope {
    fn succeeded(&self) -> bool;
    fn error_message(&self) -> Option<&str>;
}

impl Envelope for crate::dashboard::ContributorSummaries {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
