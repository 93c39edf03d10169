//! The synthesis run, from checkout files to the final document.

use crate::binding::{self, ImportBinding};
use crate::context::{NoProgress, ProgressCallback};
use crate::emitter::{self, DeclarativeBlock, EmitContext};
use crate::environment::EnvironmentSet;
use crate::error::Result;
use crate::links::SourceLinkTable;
use crate::preamble::{self, DESTINATION_LABEL, Preamble};
use crate::resolver::{self, MatchGroup};
use crate::resource_file::ResourceFile;
use crate::snapshot::Snapshot;
use hclkit::{Normalizer, OutputBuffer, SecretRewriter};
use registry::ResourceKind;
use std::collections::BTreeSet;

/// Reference every connector's `workspace_id` points at.
pub const WORKSPACE_REF: &str = "var.WORKSPACE_ID";

/// Check if a product is a GitHub product: one of its `-`/`_` separated
/// tokens is `github`.
#[must_use]
pub fn is_github_product(product: &str) -> bool {
    product
        .split(['-', '_'])
        .any(|token| token.eq_ignore_ascii_case("github"))
}

/// One synthesis run over a fetched snapshot.
#[derive(Debug, Clone)]
pub struct Synthesizer<'a> {
    envs: &'a EnvironmentSet,
    snapshot: &'a Snapshot,
    product: &'a str,
    secrets: &'a BTreeSet<String>,
}

/// State owned by a single run.
struct Run<'p> {
    out: OutputBuffer,
    links: SourceLinkTable,
    rewriter: SecretRewriter,
    blocks: usize,
    progress: &'p mut dyn ProgressCallback,
}

impl Run<'_> {
    fn append(&mut self, kind: ResourceKind, binding: &ImportBinding, block: &DeclarativeBlock) {
        self.rewriter.allow_resource_type(&block.resource_type);
        self.out.blank();
        self.out.push(binding.render());
        self.out.push(block.render());
        self.blocks += 1;
        self.progress.on_resource(kind, &block.address());
    }
}

impl<'a> Synthesizer<'a> {
    /// Create a synthesizer.
    #[must_use]
    pub fn new(
        envs: &'a EnvironmentSet,
        snapshot: &'a Snapshot,
        product: &'a str,
        secrets: &'a BTreeSet<String>,
    ) -> Self {
        Self {
            envs,
            snapshot,
            product,
            secrets,
        }
    }

    /// Synthesize the document for the given checkout files.
    ///
    /// # Errors
    ///
    /// Fails on the first ambiguous, missing or unresolvable resource. No
    /// partial document is returned.
    pub fn run(&self, files: &[ResourceFile]) -> Result<String> {
        self.run_with_progress(files, &mut NoProgress)
    }

    /// Like [`Synthesizer::run`], reporting progress.
    ///
    /// The document holds, in order: the preamble, the destination, every
    /// source, every connection. Placeholders are then rewritten and the
    /// whole text normalized once.
    ///
    /// # Errors
    ///
    /// See [`Synthesizer::run`].
    pub fn run_with_progress(
        &self,
        files: &[ResourceFile],
        progress: &mut dyn ProgressCallback,
    ) -> Result<String> {
        progress.on_start(files.len());

        let mut run = Run {
            out: OutputBuffer::new(),
            links: SourceLinkTable::new(),
            rewriter: SecretRewriter::new(),
            blocks: 0,
            progress,
        };

        Preamble {
            product: self.product,
            secrets: self.secrets,
            envs: self.envs,
        }
        .write(&mut run.out);

        self.destination(&mut run)?;

        for file in files.iter().filter(|f| f.kind == ResourceKind::Source) {
            self.source(&mut run, file)?;
        }

        for file in files.iter().filter(|f| f.kind == ResourceKind::Destination) {
            log::debug!("Skipping destination file {}", file.label);
            run.progress
                .on_skip(file.kind, &file.label, "declared by the preamble");
        }

        for file in files.iter().filter(|f| f.kind == ResourceKind::Connection) {
            self.connection(&mut run, file)?;
        }

        let Run {
            out,
            rewriter,
            blocks,
            progress,
            ..
        } = run;

        let text = rewriter.rewrite(&out.finish())?;
        let text = Normalizer::new()
            .with_personal_access_token(is_github_product(self.product))
            .normalize(&text);

        log::info!("Synthesized {blocks} resources");
        progress.on_complete(blocks);
        Ok(text)
    }

    fn destination(&self, run: &mut Run<'_>) -> Result<()> {
        let group = resolver::resolve_single(
            ResourceKind::Destination,
            DESTINATION_LABEL,
            self.snapshot,
            self.envs,
        )?;
        let block = preamble::destination_block();
        let binding = binding::bind(&block.address(), &group, self.envs)?;

        run.append(ResourceKind::Destination, &binding, &block);
        Ok(())
    }

    fn source(&self, run: &mut Run<'_>, file: &ResourceFile) -> Result<()> {
        let name = file.resource_name()?;
        let group = resolver::resolve(ResourceKind::Source, name, self.snapshot, self.envs)?;
        let block = emitter::emit_connector(ResourceKind::Source, file, WORKSPACE_REF)?;
        let binding = binding::bind(&block.address(), &group, self.envs)?;

        let address = block.address();
        for env in self.envs.iter() {
            if let Some(record) = group.get(env) {
                run.links.register(record.id.as_str(), address.as_str());
            }
        }

        run.append(ResourceKind::Source, &binding, &block);
        Ok(())
    }

    fn connection(&self, run: &mut Run<'_>, file: &ResourceFile) -> Result<()> {
        let name = file.resource_name()?;
        let group: MatchGroup =
            resolver::resolve(ResourceKind::Connection, name, self.snapshot, self.envs)?;

        let destination_address = preamble::destination_address();
        let ctx = EmitContext {
            reference: self.envs.reference(),
            destination_address: &destination_address,
        };
        let block = emitter::emit_connection(file, &group, &ctx, &run.links)?;
        let binding = binding::bind(&block.address(), &group, self.envs)?;

        run.append(ResourceKind::Connection, &binding, &block);
        Ok(())
    }
}
