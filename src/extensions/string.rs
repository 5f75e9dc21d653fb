pub trait NonEmpty {
    /// `None` for an empty string, the string itself otherwise.
    fn non_empty(&self) -> Option<&str>;
}

impl NonEmpty for str {
    fn non_empty(&self) -> Option<&str> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl NonEmpty for String {
    fn non_empty(&self) -> Option<&str> {
        self.as_str().non_empty()
    }
}

impl NonEmpty for Option<String> {
    fn non_empty(&self) -> Option<&str> {
        self.as_deref().and_then(NonEmpty::non_empty)
    }
}
