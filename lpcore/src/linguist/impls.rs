use std::ops::{Deref, DerefMut};
use super::{
    Expertise,
    Expertises,
    TranslationTool,
    TranslationTools,
    Qualification,
    Qualifications,
    Reference,
    References,
    Document,
    Documents,
};

impl From<Vec<Expertise>> for Expertises {
    fn from(args: Vec<Expertise>) -> Self {
        Self(args)
    }
}

impl From<Expertises> for Vec<Expertise> {
    fn from(value: Expertises) -> Self {
        value.0
    }
}

impl Deref for Expertises {
    type Target = Vec<Expertise>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Expertises {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<TranslationTool>> for TranslationTools {
    fn from(args: Vec<TranslationTool>) -> Self {
        Self(args)
    }
}

impl From<TranslationTools> for Vec<TranslationTool> {
    fn from(value: TranslationTools) -> Self {
        value.0
    }
}

impl Deref for TranslationTools {
    type Target = Vec<TranslationTool>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for TranslationTools {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Qualification>> for Qualifications {
    fn from(args: Vec<Qualification>) -> Self {
        Self(args)
    }
}

impl From<Qualifications> for Vec<Qualification> {
    fn from(value: Qualifications) -> Self {
        value.0
    }
}

impl Deref for Qualifications {
    type Target = Vec<Qualification>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Qualifications {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Reference>> for References {
    fn from(args: Vec<Reference>) -> Self {
        Self(args)
    }
}

impl From<References> for Vec<Reference> {
    fn from(value: References) -> Self {
        value.0
    }
}

impl Deref for References {
    type Target = Vec<Reference>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for References {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Document>> for Documents {
    fn from(args: Vec<Document>) -> Self {
        Self(args)
    }
}

impl From<Documents> for Vec<Document> {
    fn from(value: Documents) -> Self {
        value.0
    }
}

impl Deref for Documents {
    type Target = Vec<Document>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Documents {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
