use tanh_mlp::{Dataset, Network, NetworkOptions, Topology, UpdateRule};

fn main() -> tanh_mlp::Result<()> {
    let mut options = NetworkOptions::default();
    options.optimizer.rule = UpdateRule::Accumulate;

    let topology = Topology::new(vec![2, 4, 1])?;
    let mut network = Network::build_with_rng(topology, &options, &mut rand::thread_rng());

    let data = Dataset::xor();
    let epochs = 3000;

    for epoch in 0..epochs {
        for sample in &data.samples {
            network.feed_forward(&sample.input)?;
            network.back_propagate(&sample.target)?;
        }
        if epoch % 500 == 0 {
            println!(
                "Epoch {epoch}: error = {:.6}, recent average = {:.6}",
                network.current_error(),
                network.recent_average_error()
            );
        }
    }

    for sample in &data.samples {
        network.feed_forward(&sample.input)?;
        println!("Input: {:?} -> Output: {:.4}", sample.input, network.get_results()[0]);
    }

    Ok(())
}
