use std::fmt;

/// Identifies where in a described type a translation problem was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// The declaring type
    ty: String,

    /// Dotted property path from the declaring type, empty for the type itself
    property: String,

    /// The offending annotation, rendered
    annotation: Option<String>,

    /// The annotation's nested `Path`, if it carried one
    nested: Option<String>,
}

impl Location {
    pub fn new(ty: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            property: property.into(),
            annotation: None,
            nested: None,
        }
    }

    /// A location naming only the declaring type.
    pub fn of_type(ty: impl Into<String>) -> Self {
        Self::new(ty, "")
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn annotation_name(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    pub fn nested_path(&self) -> Option<&str> {
        self.nested.as_deref()
    }

    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn nested(mut self, path: impl Into<String>) -> Self {
        self.nested = Some(path.into());
        self
    }

    /// Extends the property path by one segment.
    pub fn child(&self, segment: &str) -> Self {
        let property = if self.property.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{segment}", self.property)
        };

        Self {
            ty: self.ty.clone(),
            property,
            annotation: None,
            nested: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property.is_empty() {
            write!(f, "`{}`", self.ty)?;
        } else {
            write!(f, "`{}.{}`", self.ty, self.property)?;
        }

        match (&self.annotation, &self.nested) {
            (Some(annotation), Some(nested)) => write!(f, " ({annotation} at path `{nested}`)"),
            (Some(annotation), None) => write!(f, " ({annotation})"),
            (None, Some(nested)) => write!(f, " (path `{nested}`)"),
            (None, None) => Ok(()),
        }
    }
}
