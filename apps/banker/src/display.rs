//! Output rendering and formatting

use banker_safety::{
    AllocationGraph, AllocationState, EdgeKind, NodeId, RecoveryOutcome, RecoveryReport,
    RequestOutcome, SafetyResult,
};
use banker_types::ColorChoice;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use std::io;

use crate::commands::OperationResult;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            self.render_json(result)
        } else {
            self.render_table(result)
        }
    }

    /// Render as JSON
    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = serde_json::to_string_pretty(result).map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    /// Render as formatted table
    fn render_table(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::Check {
                state,
                need,
                verdict,
            } => {
                self.render_state(state, Some(need));
                self.render_verdict(verdict, state.processes());
            }
            OperationResult::Recover {
                before,
                outcome,
                after,
            } => self.render_recovery(before, outcome, after.as_ref()),
            OperationResult::RecoverUntilSafe { before, report } => {
                self.render_recovery_report(before, report);
            }
            OperationResult::Graph { graph, cycle } => {
                self.render_graph(graph, cycle.as_deref());
            }
            OperationResult::Request {
                process,
                request,
                outcome,
            } => self.render_request(*process, request, outcome),
        }
        Ok(())
    }

    /// Render the allocation tables, with the need column when supplied
    fn render_state(&self, state: &AllocationState, need: Option<&Vec<Vec<u64>>>) {
        if state.processes() == 0 {
            println!("No processes.");
        } else {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            let mut header = vec![
                Cell::new("Process").add_attribute(Attribute::Bold),
                Cell::new("Allocation").add_attribute(Attribute::Bold),
                Cell::new("Max").add_attribute(Attribute::Bold),
            ];
            if need.is_some() {
                header.push(Cell::new("Need").add_attribute(Attribute::Bold));
            }
            table.set_header(header);

            for process in 0..state.processes() {
                let mut row = vec![
                    Cell::new(NodeId::process(process)),
                    Cell::new(format_row(&state.allocation()[process])),
                    Cell::new(format_row(&state.max_demand()[process])),
                ];
                if let Some(need) = need {
                    row.push(Cell::new(format_row(&need[process])));
                }
                table.add_row(row);
            }

            println!("{table}");
        }
        println!("Available:   {}", format_row(state.available()));
    }

    /// Render a safety verdict
    fn render_verdict(&self, verdict: &SafetyResult, processes: usize) {
        if verdict.safe {
            println!(
                "{} Safe sequence: {}",
                self.style_status("SAFE", true),
                format_sequence(&verdict.sequence)
            );
        } else {
            println!(
                "{} Deadlock possible.",
                self.style_status("UNSAFE", false)
            );
            if !verdict.sequence.is_empty() {
                println!("  Can finish: {}", format_sequence(&verdict.sequence));
            }
            println!(
                "  Stuck:      {}",
                format_sequence(&verdict.stuck(processes))
            );
        }
    }

    /// Render a single recovery step
    fn render_recovery(
        &self,
        before: &SafetyResult,
        outcome: &RecoveryOutcome,
        after: Option<&SafetyResult>,
    ) {
        match outcome {
            RecoveryOutcome::AlreadySafe { process } => {
                println!(
                    "No preemption needed: {} can be satisfied from available resources.",
                    self.style_node(NodeId::process(*process))
                );
                if !before.safe {
                    println!("Note: the full safety check still reports this state as unsafe.");
                }
            }
            RecoveryOutcome::Preempted { state, victim } => {
                println!(
                    "Preempted {}.",
                    self.style_node(NodeId::process(*victim))
                );
                self.render_state(state, None);
                if let Some(after) = after {
                    self.render_verdict(after, state.processes());
                }
            }
            RecoveryOutcome::NoProcesses => println!("No processes to preempt."),
        }
    }

    /// Render the result of repeated recovery
    fn render_recovery_report(&self, before: &SafetyResult, report: &RecoveryReport) {
        if before.safe {
            println!("State is already safe; nothing preempted.");
        } else if report.preempted.is_empty() {
            println!("Nothing could be preempted.");
        } else {
            println!(
                "Preempted {} process(es): {}",
                report.preempted.len(),
                format_sequence(&report.preempted)
            );
        }
        self.render_state(&report.state, None);
        self.render_verdict(&report.verdict, report.state.processes());
    }

    /// Render graph nodes, edges and any cycle
    fn render_graph(&self, graph: &AllocationGraph, cycle: Option<&[NodeId]>) {
        println!(
            "{} nodes, {} assignment edges, {} request edges",
            graph.nodes().len(),
            graph.assignment_edges().count(),
            graph.request_edges().count()
        );

        if !graph.edges().is_empty() {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec![
                Cell::new("From").add_attribute(Attribute::Bold),
                Cell::new("To").add_attribute(Attribute::Bold),
                Cell::new("Kind").add_attribute(Attribute::Bold),
            ]);
            for edge in graph.edges() {
                let kind = match edge.kind {
                    EdgeKind::Assignment => Cell::new("assignment").fg(Color::Blue),
                    EdgeKind::Request => Cell::new("request").fg(Color::Red),
                };
                table.add_row(vec![Cell::new(edge.from), Cell::new(edge.to), kind]);
            }
            println!("{table}");
        }

        match cycle {
            Some(cycle) => {
                let path: Vec<String> = cycle
                    .iter()
                    .chain(cycle.first())
                    .map(ToString::to_string)
                    .collect();
                println!("Cycle: {}", path.join(" -> "));
                println!("  A cycle signals possible deadlock; run `check` for the verdict.");
            }
            None => println!("No cycle."),
        }
    }

    /// Render a resource request decision
    fn render_request(&self, process: usize, request: &[u64], outcome: &RequestOutcome) {
        let node = self.style_node(NodeId::process(process));
        let request = format_row(request);
        match outcome {
            RequestOutcome::Granted { state, sequence } => {
                println!(
                    "{} Request {request} by {node} granted. Safe sequence: {}",
                    self.style_status("GRANTED", true),
                    format_sequence(sequence)
                );
                self.render_state(state, None);
            }
            RequestOutcome::MustWait => {
                println!(
                    "{} Request {request} by {node} exceeds available resources.",
                    self.style_status("WAIT", false)
                );
            }
            RequestOutcome::Denied { .. } => {
                println!(
                    "{} Request {request} by {node} would leave the system unsafe.",
                    self.style_status("DENIED", false)
                );
            }
        }
    }

    /// Style a verdict word
    fn style_status(&self, text: &str, ok: bool) -> String {
        if self.supports_color() {
            let style = if ok {
                Style::new().green().bold()
            } else {
                Style::new().red().bold()
            };
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Style a node label
    fn style_node(&self, node: NodeId) -> String {
        if self.supports_color() {
            Style::new().bold().apply_to(node).to_string()
        } else {
            node.to_string()
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

fn format_row(row: &[u64]) -> String {
    let values: Vec<String> = row.iter().map(ToString::to_string).collect();
    format!("[{}]", values.join(", "))
}

fn format_sequence(sequence: &[usize]) -> String {
    if sequence.is_empty() {
        return "-".to_string();
    }
    let labels: Vec<String> = sequence
        .iter()
        .map(|&process| NodeId::process(process).to_string())
        .collect();
    labels.join(", ")
}
