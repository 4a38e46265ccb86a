use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::field::{Field, Visit};
use tracing::span;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Writes the nodes visited and queued by each search to TSV files in `output_dir`, named after
/// the `seq_id` of the search span.
pub struct SearchNodeLayer {
    output_dir: PathBuf,
}

impl SearchNodeLayer {
    pub fn new(output_dir: &Path) -> Self {
        SearchNodeLayer {
            output_dir: output_dir.to_owned(),
        }
    }

    fn create_output_files(&self, seq_id: &str) -> Option<SpanOutputFiles> {
        let visited_fname = self.output_dir.join(format!("{}_visited.tsv", seq_id));
        let queued_fname = self.output_dir.join(format!("{}_queued.tsv", seq_id));

        let open = |fname: &Path| -> Option<BufWriter<File>> {
            let result = File::create(fname)
                .map(BufWriter::new)
                .and_then(|mut file| {
                    writeln!(&mut file, "lidx\tridx\tsteps\tpenalty\tpriority")?;
                    Ok(file)
                });

            match result {
                Ok(file) => Some(file),
                Err(e) => {
                    eprintln!("Could not open search node file {:?}: {}", fname, e);
                    None
                }
            }
        };

        Some(SpanOutputFiles {
            visited: open(&visited_fname)?,
            queued: open(&queued_fname)?,
        })
    }
}

impl<S> Layer<S> for SearchNodeLayer
where
    S: tracing::Subscriber,
    S: for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        if span.name() != "astar_run" {
            return;
        }

        let mut seq_id = SeqId::default();
        attrs.record(&mut seq_id);
        let seq_id = seq_id.0.unwrap_or_else(|| format!("search_{}", id.into_u64()));

        if let Some(files) = self.create_output_files(&seq_id) {
            span.extensions_mut().insert(files);
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        let target = event.metadata().target();
        let is_visit = target.ends_with("set_visited");
        let is_queue = target.ends_with("queue_item");

        if !is_visit && !is_queue {
            return;
        }

        let mut node = SearchNodeFields::default();
        event.record(&mut node);

        let Some(span) = ctx.event_span(event) else {
            eprintln!("No span found for {:?}", node);
            return;
        };

        let mut extensions = span.extensions_mut();
        let Some(files) = extensions.get_mut::<SpanOutputFiles>() else {
            return;
        };

        let writer = if is_visit { &mut files.visited } else { &mut files.queued };
        let result = writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            node.lidx.unwrap_or(i64::MIN),
            node.ridx.unwrap_or(i64::MIN),
            node.steps.unwrap_or(u64::MAX),
            node.penalty.unwrap_or(f64::NAN),
            node.priority.unwrap_or(f64::NAN),
        );

        if let Err(e) = result {
            eprintln!("Could not write search node {:?}: {}", node, e);
        }
    }
}

struct SpanOutputFiles {
    visited: BufWriter<File>,
    queued: BufWriter<File>,
}

#[derive(Debug, Default)]
struct SeqId(Option<String>);

impl Visit for SeqId {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "seq_id" {
            self.0 = Some(String::from(value))
        }
    }

    fn record_debug(&mut self, _: &Field, _: &dyn fmt::Debug) {

    }
}

#[derive(Debug, Default)]
struct SearchNodeFields {
    lidx: Option<i64>,
    ridx: Option<i64>,
    steps: Option<u64>,
    penalty: Option<f64>,
    priority: Option<f64>,
}

impl Visit for SearchNodeFields {
    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            "lidx" => self.lidx = Some(value),
            "ridx" => self.ridx = Some(value),
            _ => self.record_debug(field, &value),
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "steps" => self.steps = Some(value),
            _ => self.record_debug(field, &value),
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "penalty" => self.penalty = Some(value),
            "priority" => self.priority = Some(value),
            _ => self.record_debug(field, &value),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() != "message" {
            eprintln!("Ignoring field {} = {:?}", field.name(), value)
        }
    }
}
