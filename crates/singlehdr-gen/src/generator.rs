//! Single header generation
//!
//! Collects fragments into the public and private pools, orders each pool
//! and lays the result out with [`DocumentAssembler`].

use crate::assemble::DocumentAssembler;
use crate::graph::{DependencyGraph, FragmentPool};
use crate::preprocessor::Preprocessor;
use crate::source::SourceProvider;
use rayon::prelude::*;
use singlehdr_core::{Config, FileId, Result, SourceFragment, Visibility};
use tracing::{debug, info};

/// Emission order of both pools
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Layers of the public pool, dependencies first
    pub public: Vec<Vec<FileId>>,
    /// Layers of the private pool, dependencies first
    pub private: Vec<Vec<FileId>>,
}

impl Plan {
    pub fn public_order(&self) -> Vec<&FileId> {
        self.public.iter().flatten().collect()
    }

    pub fn private_order(&self) -> Vec<&FileId> {
        self.private.iter().flatten().collect()
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (visibility, layers) in [
            (Visibility::Public, &self.public),
            (Visibility::Private, &self.private),
        ] {
            writeln!(f, "{}:", visibility)?;
            if layers.is_empty() {
                writeln!(f, "  (none)")?;
            }
            for (i, layer) in layers.iter().enumerate() {
                let names: Vec<_> = layer.iter().map(|id| id.as_str()).collect();
                writeln!(f, "  {}. {}", i + 1, names.join(", "))?;
            }
        }
        Ok(())
    }
}

/// Amalgamates public and private fragments into one header
pub struct SingleHeaderGenerator {
    assembler: DocumentAssembler,
    public: FragmentPool,
    private: FragmentPool,
}

impl SingleHeaderGenerator {
    pub fn new(include_guard: impl Into<String>, impl_define: impl Into<String>) -> Self {
        Self {
            assembler: DocumentAssembler::new(include_guard, impl_define),
            public: FragmentPool::new(Visibility::Public),
            private: FragmentPool::new(Visibility::Private),
        }
    }

    /// Create a generator with the guards and header block of `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let mut generator = Self::new(config.include_guard.clone(), config.impl_define.clone());
        generator
            .assembler
            .set_additional_header(config.additional_header_text()?);
        Ok(generator)
    }

    /// Inject `header` verbatim after the outer guard
    pub fn with_additional_header(mut self, header: impl Into<String>) -> Self {
        self.assembler = self.assembler.with_additional_header(header);
        self
    }

    /// Register an already preprocessed public fragment
    pub fn add_public_source(
        &mut self,
        file_name: &str,
        text: impl Into<String>,
        includes: &[&str],
    ) {
        self.add_fragment(Visibility::Public, fragment(file_name, text, includes));
    }

    /// Register an already preprocessed private fragment
    pub fn add_private_source(
        &mut self,
        file_name: &str,
        text: impl Into<String>,
        includes: &[&str],
    ) {
        self.add_fragment(Visibility::Private, fragment(file_name, text, includes));
    }

    pub fn add_fragment(&mut self, visibility: Visibility, fragment: SourceFragment) {
        let pool = match visibility {
            Visibility::Public => &mut self.public,
            Visibility::Private => &mut self.private,
        };
        if let Some(previous) = pool.insert(fragment) {
            debug!("Replaced {} fragment {}", visibility, previous.id());
        }
    }

    /// Read, preprocess and register every file listed by `provider`
    ///
    /// Files are read one after another and the first unreadable file aborts
    /// the whole operation. Returns the number of files added.
    pub fn add_source_files(
        &mut self,
        provider: &dyn SourceProvider,
        preprocessor: &Preprocessor,
    ) -> Result<usize> {
        let entries = provider.list_files()?;
        info!("Found {} source files", entries.len());

        let sources = entries
            .into_iter()
            .map(|entry| {
                let text = provider.read_file(&entry.dir, &entry.file_name)?;
                Ok((entry, text))
            })
            .collect::<Result<Vec<_>>>()?;

        let fragments: Vec<_> = sources
            .par_iter()
            .map(|(entry, text)| {
                let id = entry.id();
                let preprocessed = preprocessor.preprocess(id.as_str(), text);
                let deps = preprocessed
                    .includes
                    .iter()
                    .map(|include| FileId::join(&entry.dir, include))
                    .collect();
                debug!("Preprocessed {} ({} local includes)", id, preprocessed.includes.len());
                (entry.visibility, SourceFragment::new(id, preprocessed.text, deps))
            })
            .collect();

        let count = fragments.len();
        for (visibility, fragment) in fragments {
            self.add_fragment(visibility, fragment);
        }

        Ok(count)
    }

    pub fn public_pool(&self) -> &FragmentPool {
        &self.public
    }

    pub fn private_pool(&self) -> &FragmentPool {
        &self.private
    }

    /// Order both pools
    ///
    /// Private dependencies on public files are already satisfied by the
    /// public region and never constrain the private order.
    pub fn plan(&self) -> Result<Plan> {
        let public = DependencyGraph::from_pool(&self.public, None).layers()?;
        let private = DependencyGraph::from_pool(&self.private, Some(&self.public)).layers()?;
        Ok(Plan { public, private })
    }

    /// Produce the amalgamated header
    pub fn generate(&self) -> Result<String> {
        let plan = self.plan()?;

        let public: Vec<&SourceFragment> = plan
            .public_order()
            .into_iter()
            .filter_map(|id| self.public.get(id))
            .collect();
        let private: Vec<&SourceFragment> = plan
            .private_order()
            .into_iter()
            .filter_map(|id| self.private.get(id))
            .collect();

        info!(
            "Amalgamating {} public and {} private sources",
            public.len(),
            private.len()
        );

        Ok(self.assembler.assemble(&public, &private))
    }
}

fn fragment(file_name: &str, text: impl Into<String>, includes: &[&str]) -> SourceFragment {
    SourceFragment::new(
        FileId::new(file_name),
        text,
        includes.iter().map(|include| FileId::new(include)).collect(),
    )
}
