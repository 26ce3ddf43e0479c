use crate::infra::data_from_input;
use clap::Args;
use decision_matrix::config::AppConfig;
use decision_matrix::decision::{
    decode, share_link, DecisionModel, DecisionService, EvaluationView, Score,
};
use decision_matrix::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Encoded model, or a full share link containing `?data=`
    #[arg(long)]
    pub(crate) data: String,
    /// Print the table as CSV instead of aligned text
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug)]
pub(crate) struct LinkArgs {
    /// Encoded model, or a full share link containing `?data=`
    #[arg(long)]
    pub(crate) data: String,
    /// Base URL for the link (defaults to APP_PUBLIC_URL or the configured address)
    #[arg(long)]
    pub(crate) base_url: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Base URL for the printed link (defaults to APP_PUBLIC_URL or the configured address)
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    /// Also add an unscored "Support" criterion to show average substitution
    #[arg(long)]
    pub(crate) with_support: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let model = decode(&data_from_input(&args.data));
    let evaluation = model.evaluate();

    if args.csv {
        print!("{}", evaluation.table.to_csv()?);
    } else {
        print!("{}", evaluation.table.to_text());
    }
    Ok(())
}

pub(crate) fn run_link(args: LinkArgs) -> Result<(), AppError> {
    let base_url = resolve_base_url(args.base_url)?;
    let model = decode(&data_from_input(&args.data));
    println!("{}", share_link(&base_url, &model));
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let base_url = resolve_base_url(args.base_url)?;
    let service = DecisionService::new(base_url);
    let model = demo_model(args.with_support)?;
    let view = service.evaluate(&model);
    render_demo(&view);
    Ok(())
}

fn resolve_base_url(base_url: Option<String>) -> Result<String, AppError> {
    match base_url {
        Some(url) => Ok(url),
        None => Ok(AppConfig::load()?.public_url()),
    }
}

pub(crate) fn demo_model(with_support: bool) -> Result<DecisionModel, AppError> {
    let mut model = DecisionModel::new();
    let price = model.add_criterion("Price", 2.0);
    let quality = model.add_criterion("Quality", 3.0);
    let a = model.add_choice("A");
    let b = model.add_choice("B");

    model.set_score(a, price, Some(Score::new(8.0)?));
    model.set_score(a, quality, Some(Score::new(6.0)?));
    model.set_score(b, price, Some(Score::new(5.0)?));
    model.set_score(b, quality, Some(Score::new(9.0)?));

    if with_support {
        let c = model.add_choice("C");
        let support = model.add_criterion("Support", 1.0);
        model.set_score(c, price, Some(Score::new(7.0)?));
        model.set_score(c, support, Some(Score::new(9.0)?));
    }

    Ok(model)
}

fn render_demo(view: &EvaluationView) {
    println!("Decision matrix demo");
    println!("====================");
    print!("{}", view.table.to_text());
    println!();
    println!("Ranking:");
    for result in &view.results {
        println!("  #{} {} ({:.2})", result.rank, result.choice, result.score);
    }
    println!();
    println!("Link to this comparison: {}", view.share_link);
}
