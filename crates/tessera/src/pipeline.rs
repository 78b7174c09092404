use crate::{
    extract::{Extracted, ExtractionPlan},
    key_matcher::Domains,
    reconstitute::{ReconstitutionPlan, Reconstitutor},
};
use std::sync::Arc;
use tessera_core::{schema::Table, Catalog, Object, Result};

/// Everything compiled for one entity type: its table and the plans moving
/// instances in and out of it.
#[derive(Debug)]
pub struct Pipeline {
    table: Table,
    extraction: ExtractionPlan,
    reconstitution: Arc<ReconstitutionPlan>,

    /// Candidate limit given to every key matcher
    limit: Option<usize>,
}

impl Pipeline {
    pub(crate) fn compile(
        catalog: &Catalog,
        table: Table,
        limit: Option<usize>,
    ) -> Result<Pipeline> {
        let extraction = ExtractionPlan::compile(catalog, &table);
        let reconstitution = ReconstitutionPlan::compile(catalog, &table)?;

        Ok(Pipeline {
            table,
            extraction,
            reconstitution: Arc::new(reconstitution),
            limit,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn extraction(&self) -> &ExtractionPlan {
        &self.extraction
    }

    pub fn reconstitution(&self) -> &ReconstitutionPlan {
        &self.reconstitution
    }

    pub fn extract(&self, instance: &Object) -> Extracted {
        self.extraction.execute(instance)
    }

    /// Binds the reconstitution plan to candidate domains for referenced
    /// entities.
    pub fn reconstitutor(&self, domains: &Domains) -> Result<Reconstitutor> {
        Reconstitutor::new(self.reconstitution.clone(), domains, self.limit)
    }
}
