//! Multiway command implementation.

use anyhow::Result;
use bubble_multiway_ops::{BuildRequest, ExportGraph, GraphKind, MultiwayResponse, OpsContext};

use super::{print_render, write_exports, yes_no, MultiwayArgs};

/// Build the multiway graph, print its statistics and write artifacts.
pub fn execute(ctx: &OpsContext, args: &MultiwayArgs) -> Result<MultiwayResponse> {
    let request = BuildRequest::new(args.input.selector()?).with_super_source(args.super_source);
    let response = ctx.build_multiway(&request)?;
    print_summary(&response);

    write_exports(
        ctx,
        GraphKind::Multiway,
        &request.input,
        &ExportGraph::from_multiway(&response.graph),
        &args.output,
    )?;

    let hints = args.output.hints(ctx, GraphKind::Multiway);
    for path in args.output.images() {
        let outcome = ctx.render_multiway(&response, path, &hints)?;
        print_render(&outcome);
    }

    Ok(response)
}

fn print_summary(response: &MultiwayResponse) {
    let summary = &response.summary;
    println!("🔢 Input values: {:?}", response.input_values());
    println!("📊 Multiway graph");
    println!("{:─<50}", "");
    println!("   States:          {}", summary.states);
    println!("   Nodes:           {}", summary.nodes);
    println!("   Edges:           {}", summary.edges);
    println!("   DAG:             {}", yes_no(summary.is_dag));
    println!("   Sources:         {}", summary.sources);
    println!("   Sinks:           {}", summary.sinks);
    println!("   Max inversions:  {}", response.max_inversions);
    println!("   Input inversions: {}", response.input.input_inversions());
    println!(
        "   Sorted {}:  present={} sink={}",
        response.sorted_state,
        yes_no(summary.sorted_present),
        yes_no(summary.sorted_is_sink)
    );
    if response.graph.super_source().is_some() {
        println!("   Super-source:    yes");
    }
}
