use super::Type;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TypeEnum {
    /// Name of the enumeration as declared by the application
    pub name: String,

    pub variants: Vec<EnumVariant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    pub name: String,

    /// Integer representation used when the enum is stored numerically
    pub discriminant: i64,
}

impl TypeEnum {
    /// Creates an enum whose discriminants follow declaration order.
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let variants = variants
            .into_iter()
            .enumerate()
            .map(|(i, name)| EnumVariant {
                name: name.into(),
                discriminant: i as i64,
            })
            .collect();

        Self {
            name: name.into(),
            variants,
        }
    }

    pub fn with_discriminants<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants
                .into_iter()
                .map(|(name, discriminant)| EnumVariant {
                    name: name.into(),
                    discriminant,
                })
                .collect(),
        }
    }

    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|variant| variant.name == name)
    }

    pub fn variant_by_discriminant(&self, discriminant: i64) -> Option<&EnumVariant> {
        self.variants
            .iter()
            .find(|variant| variant.discriminant == discriminant)
    }
}

impl From<TypeEnum> for Type {
    fn from(value: TypeEnum) -> Self {
        Self::Enum(value)
    }
}
