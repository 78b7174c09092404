use tessera_core::{
    meta::{Annotation, AnnotationKind, Check, Path},
    schema::EnumStorage,
    stmt::Value,
    Error, Location, Reason, Result,
};

/// An annotation as it applies to one property.
///
/// Annotations declared on an enclosing property reach nested properties
/// through their `Path`. Each hop strips one path segment and raises the
/// level: the outermost declaration wins.
#[derive(Debug, Clone)]
pub(super) struct Applied {
    /// Remaining path below the property this is applied to
    pub(super) path: Option<Path>,

    pub(super) kind: AnnotationKind,

    pub(super) level: usize,

    /// Declared by the type owning the table (the entity, or the relation
    /// property for a child table)
    pub(super) owner: bool,

    /// The path as declared
    origin: Option<Path>,
}

impl Applied {
    pub(super) fn declared(annotations: &[Annotation], owner: bool) -> Vec<Applied> {
        annotations
            .iter()
            .map(|annotation| Applied {
                path: annotation.path.clone(),
                kind: annotation.kind.clone(),
                level: 0,
                owner,
                origin: annotation.path.clone(),
            })
            .collect()
    }

    pub(super) fn location(&self, at: &Location) -> Location {
        let location = at.clone().annotation(self.kind.to_string());
        match &self.origin {
            Some(path) => location.nested(path.as_str()),
            None => location,
        }
    }

    pub(super) fn error(&self, at: &Location, reason: Reason, message: impl Into<String>) -> Error {
        Error::translation(reason, self.location(at), message)
    }

    /// Re-targets the annotation at the property itself, keeping its
    /// precedence.
    pub(super) fn owned(mut self) -> Applied {
        self.owner = true;
        self
    }
}

/// Splits annotations into those targeting the property itself and those
/// targeting nested properties.
pub(super) fn split(applied: Vec<Applied>) -> (Vec<Applied>, Vec<Applied>) {
    applied
        .into_iter()
        .partition(|applied| applied.path.is_none())
}

/// Annotations forwarded to the nested property `name`.
pub(super) fn forward(forwards: &[Applied], name: &str) -> Vec<Applied> {
    forwards
        .iter()
        .filter_map(|applied| {
            let (first, rest) = applied.path.as_ref()?.split_first();
            (first == name).then(|| Applied {
                path: rest,
                level: applied.level + 1,
                ..applied.clone()
            })
        })
        .collect()
}

/// Every forwarded annotation must name a nested property.
pub(super) fn check_forwards(forwards: &[Applied], names: &[&str], at: &Location) -> Result<()> {
    for applied in forwards {
        let Some(path) = &applied.path else { continue };

        if path.segments().any(|segment| !super::is_identifier(segment)) {
            return Err(applied.error(at, Reason::InvalidPath, "malformed property path"));
        }

        let (first, _) = path.split_first();
        if !names.contains(&first) {
            return Err(applied.error(
                at,
                Reason::InvalidPath,
                format!("no nested property named `{first}`"),
            ));
        }
    }
    Ok(())
}

/// Rejects annotations carrying a path on a property with no nested
/// properties.
pub(super) fn reject_paths(forwards: &[Applied], at: &Location) -> Result<()> {
    match forwards.first() {
        Some(applied) => Err(applied.error(
            at,
            Reason::InvalidPath,
            "paths are only valid on aggregate properties",
        )),
        None => Ok(()),
    }
}

/// The annotations that apply to one property, after precedence.
#[derive(Debug)]
pub(super) struct Own {
    items: Vec<Applied>,
}

impl Own {
    pub(super) fn resolve(mut own: Vec<Applied>, at: &Location) -> Result<Own> {
        for (i, applied) in own.iter().enumerate() {
            for earlier in own[..i].iter().filter(|earlier| earlier.level == applied.level) {
                if applied.kind.same_kind(&earlier.kind) && !applied.kind.is_repeatable() {
                    return Err(applied.error(
                        at,
                        Reason::DuplicateAnnotation,
                        "the annotation may appear only once",
                    ));
                }

                if is_nullability_pair(&applied.kind, &earlier.kind) {
                    return Err(applied.error(
                        at,
                        Reason::ConflictingAnnotations,
                        "a field cannot be both nullable and non-nullable",
                    ));
                }
            }
        }

        // Outermost first, declaration order within a level
        own.sort_by(|a, b| b.level.cmp(&a.level));

        let mut items: Vec<Applied> = vec![];
        for applied in own {
            let shadowed = items.iter().any(|kept| {
                (kept.kind.same_kind(&applied.kind) && !applied.kind.is_repeatable())
                    || is_nullability_pair(&kept.kind, &applied.kind)
            });

            if !shadowed {
                items.push(applied);
            }
        }

        let resolved = Own { items };

        if let (Some(calculated), Some(_)) = (resolved.calculated(), resolved.primary_key()) {
            return Err(calculated.error(
                at,
                Reason::ConflictingAnnotations,
                "a calculated property cannot be part of the primary key",
            ));
        }

        Ok(resolved)
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = &Applied> + '_ {
        self.items.iter()
    }

    fn find(&self, f: impl Fn(&AnnotationKind) -> bool) -> Option<&Applied> {
        self.items.iter().find(|applied| f(&applied.kind))
    }

    /// Fails with `InapplicableAnnotation` on the first annotation `allowed`
    /// rejects.
    pub(super) fn reject(
        &self,
        at: &Location,
        allowed: impl Fn(&AnnotationKind) -> bool,
        message: &str,
    ) -> Result<()> {
        match self.items.iter().find(|applied| !allowed(&applied.kind)) {
            Some(applied) => Err(applied.error(at, Reason::InapplicableAnnotation, message)),
            None => Ok(()),
        }
    }

    pub(super) fn name(&self) -> Option<(&str, &Applied)> {
        self.items.iter().find_map(|applied| match &applied.kind {
            AnnotationKind::Name(name) => Some((name.as_str(), applied)),
            _ => None,
        })
    }

    pub(super) fn nullable(&self) -> Option<bool> {
        self.items.iter().find_map(|applied| match applied.kind {
            AnnotationKind::Nullable => Some(true),
            AnnotationKind::NonNullable => Some(false),
            _ => None,
        })
    }

    pub(super) fn column(&self) -> Option<usize> {
        self.items.iter().find_map(|applied| match applied.kind {
            AnnotationKind::Column(column) => Some(column),
            _ => None,
        })
    }

    pub(super) fn default(&self) -> Option<(&Value, &Applied)> {
        self.items.iter().find_map(|applied| match &applied.kind {
            AnnotationKind::Default(value) => Some((value, applied)),
            _ => None,
        })
    }

    pub(super) fn primary_key(&self) -> Option<&Applied> {
        self.find(|kind| matches!(kind, AnnotationKind::PrimaryKey))
    }

    pub(super) fn unique(&self) -> Option<(Option<&str>, &Applied)> {
        self.items.iter().find_map(|applied| match &applied.kind {
            AnnotationKind::Unique(name) => Some((name.as_deref(), applied)),
            _ => None,
        })
    }

    pub(super) fn checks(&self) -> impl Iterator<Item = (&Check, &Applied)> + '_ {
        self.items.iter().filter_map(|applied| match &applied.kind {
            AnnotationKind::Check(check) => Some((check, applied)),
            _ => None,
        })
    }

    pub(super) fn converter(&self) -> Option<(&str, &[Value], &Applied)> {
        self.items.iter().find_map(|applied| match &applied.kind {
            AnnotationKind::Converter { name, args } => Some((name.as_str(), &args[..], applied)),
            _ => None,
        })
    }

    pub(super) fn enum_storage(&self) -> Option<(EnumStorage, &Applied)> {
        self.items.iter().find_map(|applied| match applied.kind {
            AnnotationKind::EnumStorage(storage) => Some((storage, applied)),
            _ => None,
        })
    }

    pub(super) fn calculated(&self) -> Option<&Applied> {
        self.find(AnnotationKind::is_calculated)
    }
}

fn is_nullability_pair(a: &AnnotationKind, b: &AnnotationKind) -> bool {
    matches!(
        (a, b),
        (AnnotationKind::Nullable, AnnotationKind::NonNullable)
            | (AnnotationKind::NonNullable, AnnotationKind::Nullable)
    )
}
