use anyhow::Result;
use clap::Parser;

use scene_parsing_prep::{
    cli::{Cli, Commands},
    meta::{ClassTable, Palette},
    tree::render_tree,
    BatchConfig, BatchEdgeMapBuilder, BoundaryExtractor, ConsoleProgressReporter,
    DefaultBatchConfig, LabelImageStore, LocalLabelStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::BuildEdges {
            split_directory,
            classes,
            radius,
            workers,
            report,
            quiet,
        } => {
            let extractor = BoundaryExtractor::new(classes, radius)?;
            let config = DefaultBatchConfig::default().with_workers(workers);
            let reporter = if quiet {
                ConsoleProgressReporter::quiet()
            } else {
                ConsoleProgressReporter::new()
            };
            let builder =
                BatchEdgeMapBuilder::new(LocalLabelStore::new(), extractor, config, reporter);

            if !quiet {
                println!("📂 対象分割: {}", split_directory.display());
                println!(
                    "⚙️  クラス数: {classes}, 半径: {radius}, ワーカー数: {}",
                    builder.config().worker_count()
                );
            }

            let summary = builder.run_split(&split_directory).await?;

            if !quiet {
                println!("\n📊 処理結果:");
                println!("   - 対象ファイル数: {}", summary.total);
                println!("   - 成功: {}", summary.succeeded);
                println!("   - 失敗: {}", summary.failed());
                println!("   - 所要時間: {}ms", summary.elapsed_ms);
                for failure in &summary.failures {
                    println!(
                        "     ❌ {} [{}] {}",
                        failure.path.display(),
                        failure.kind.as_str(),
                        failure.message
                    );
                }
            }

            if let Some(report_path) = report {
                let json = serde_json::to_string_pretty(&summary)?;
                std::fs::write(&report_path, json)?;
                if !quiet {
                    println!("📄 レポート出力: {}", report_path.display());
                }
            }

            if summary.has_failures() {
                std::process::exit(1);
            }
        }

        Commands::ConvertInfo { input, output } => {
            let table = ClassTable::load_txt(&input)?;
            table.save_json(&output)?;
            println!(
                "✅ クラス統計を変換しました: {} クラス -> {}",
                table.len(),
                output.display()
            );
        }

        Commands::ConvertPalette {
            input,
            output,
            classes,
        } => {
            let palette = Palette::load_text(&input, classes)?;
            palette.save_json(&output)?;
            println!(
                "✅ パレットを変換しました: {} エントリ（背景含む） -> {}",
                palette.len(),
                output.display()
            );
        }

        Commands::Inspect {
            images,
            annotations,
            palette,
            info,
            out,
        } => {
            let (image_path, label_path) =
                scene_parsing_prep::split::random_example_paths(&images, &annotations)?;
            println!("🖼  画像: {}", image_path.display());
            println!("🏷  ラベル: {}", label_path.display());

            if let Some(palette_path) = palette {
                let palette = Palette::load_json(&palette_path)?;
                let store = LocalLabelStore::new();
                let label = store.read_label(&label_path).await?;

                if let Some(info_path) = info {
                    let table = ClassTable::load_json(&info_path)?;
                    println!("📋 凡例:");
                    for entry in palette.legend(&label, &table)? {
                        let [r, g, b] = entry.color;
                        println!(
                            "   {:>3} {:<30} rgb({r}, {g}, {b})",
                            entry.class_id, entry.name
                        );
                    }
                }

                if let Some(out_path) = out {
                    palette.colorize(&label)?.save(&out_path)?;
                    println!("🎨 彩色ラベル出力: {}", out_path.display());
                }
            }
        }

        Commands::Tree { directory } => {
            print!("{}", render_tree(&directory)?);
        }
    }

    Ok(())
}
