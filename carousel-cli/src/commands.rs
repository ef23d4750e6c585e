//! Subcommand implementations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use carousel_core::{
    read_image_file, AspectRatio, CarouselSession, DeckDocument, Notice, NoticeLevel,
    ProductBrief, StickerElement, TextPosition, TextSize,
};
use carousel_renderer::export::{
    batch_failed_notice, batch_started_notice, slide_exported_notice, slide_failed_notice,
    slide_started_notice,
};
use carousel_renderer::SlideExporter;
use tracing::{debug, info, warn};

use crate::copy_client::HttpCopyClient;
use crate::{CliArgs, Command};

/// Run one command.
///
/// # Errors
///
/// Returns an error if the deck file cannot be read or written, or the
/// action is rejected.
#[allow(clippy::too_many_lines)]
pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    let export_config = args.export_config();
    match args.command {
        Command::New {
            deck,
            aspect_ratio,
            force,
        } => {
            if deck.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", deck.display());
            }
            let mut session = CarouselSession::new();
            session.set_aspect_ratio(aspect_ratio);
            save(&deck, &session)?;
            println!("Created {} ({})", deck.display(), aspect_ratio.config().label);
            Ok(())
        }
        Command::AddSlide { deck, slide } => edit(&deck, slide, |session| {
            session.add_slide();
            Ok(())
        }),
        Command::DeleteSlide { deck, slide } => {
            let mut session = load(&deck)?;
            let result = session.delete_slide(to_index(slide)?);
            finish(&deck, &mut session, result.map(|_| ()))
        }
        Command::Background {
            deck,
            slide,
            background_type,
            color,
        } => {
            if background_type.is_none() && color.is_none() {
                bail!("nothing to change: pass --type and/or --color");
            }
            edit(&deck, slide, |session| {
                if let Some(background_type) = background_type {
                    session.set_background_type(background_type);
                }
                if let Some(color) = color {
                    session.set_background_color(color);
                }
                Ok(())
            })
        }
        Command::SetImage {
            deck,
            image,
            slide,
            cell,
        } => {
            let data = fs::read(&image).with_context(|| format!("reading {}", image.display()))?;
            edit(&deck, slide, |session| match cell {
                Some(cell) => session.upload_grid_image(to_index(cell)?, &data).map_err(Into::into),
                None => session.upload_background_image(&data).map_err(Into::into),
            })
        }
        Command::AddText {
            deck,
            text,
            slide,
            size,
            position,
        } => edit(&deck, slide, |session| add_text(session, text, size, position)),
        Command::RemoveText {
            deck,
            element,
            slide,
        } => edit(&deck, slide, |session| {
            let id = session
                .current_slide()
                .text_elements
                .get(to_index(element)?)
                .map(|t| t.id)
                .with_context(|| format!("slide {slide} has no text element {element}"))?;
            session.remove_text(id);
            Ok(())
        }),
        Command::AddSticker {
            deck,
            image,
            slide,
            x,
            y,
            width,
            height,
        } => {
            let src = read_image_file(&image)?;
            edit(&deck, slide, |session| {
                session.add_sticker(StickerElement::new(src, x, y, width, height));
                Ok(())
            })
        }
        Command::Suggest {
            deck,
            product,
            slide,
            server_url,
            add,
            size,
            position,
        } => {
            let brief: ProductBrief = serde_json::from_str(
                &fs::read_to_string(&product)
                    .with_context(|| format!("reading {}", product.display()))?,
            )
            .with_context(|| format!("parsing {}", product.display()))?;
            let client = HttpCopyClient::new(&server_url)?;
            suggest(&deck, slide, brief, &client, add.then_some((size, position))).await
        }
        Command::Export {
            deck,
            out,
            aspect_ratio,
        } => {
            let session = load(&deck)?;
            let aspect_ratio = aspect_ratio.unwrap_or_else(|| session.aspect_ratio());
            let exporter = SlideExporter::new(export_config);
            export_all(&exporter, &session, aspect_ratio, &out)
        }
        Command::ExportSlide {
            deck,
            slide,
            out,
            aspect_ratio,
        } => {
            let session = load(&deck)?;
            let aspect_ratio = aspect_ratio.unwrap_or_else(|| session.aspect_ratio());
            let exporter = SlideExporter::new(export_config);
            export_slide(&exporter, &session, to_index(slide)?, aspect_ratio, out)
        }
        Command::Ratios => {
            for ratio in AspectRatio::ALL {
                let config = ratio.config();
                println!(
                    "{:<5} {:>4}x{:<4} {:<9} {}",
                    ratio, config.width, config.height, config.label, config.description
                );
            }
            Ok(())
        }
    }
}

/// Load, select `slide`, apply `action`, report notices and save on success.
fn edit(
    deck: &Path,
    slide: usize,
    action: impl FnOnce(&mut CarouselSession) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let mut session = load(deck)?;
    let result = session
        .select_slide(to_index(slide)?)
        .map_err(anyhow::Error::from)
        .and_then(|()| action(&mut session));
    finish(deck, &mut session, result)
}

fn finish<E>(deck: &Path, session: &mut CarouselSession, result: Result<(), E>) -> anyhow::Result<()>
where
    E: Into<anyhow::Error>,
{
    report(session.drain_notices());
    result.map_err(Into::into)?;
    save(deck, session)
}

fn add_text(
    session: &mut CarouselSession,
    text: String,
    size: TextSize,
    position: TextPosition,
) -> anyhow::Result<()> {
    let editor = session.editor_mut();
    editor.text_input = text;
    editor.text_size = size;
    editor.text_position = position;
    session.add_text()?;
    Ok(())
}

async fn suggest(
    deck: &Path,
    slide: usize,
    product: ProductBrief,
    client: &HttpCopyClient,
    add: Option<(TextSize, TextPosition)>,
) -> anyhow::Result<()> {
    let mut session = load(deck)?;
    session.select_slide(to_index(slide)?)?;
    session.select_product(Some(product));

    let result = session.generate_text(client).await;
    report(session.drain_notices());
    result?;

    let text = session.editor().text_input.clone();
    println!("{text}");

    if let Some((size, position)) = add {
        let result = add_text(&mut session, text, size, position);
        finish(deck, &mut session, result)?;
        info!(slide, "suggestion added");
    }
    Ok(())
}

fn export_all(
    exporter: &SlideExporter,
    session: &CarouselSession,
    aspect_ratio: AspectRatio,
    out: &Path,
) -> anyhow::Result<()> {
    report([batch_started_notice()]);
    let batch = match exporter.export_all(session.deck().slides(), aspect_ratio) {
        Ok(batch) => batch,
        Err(e) => {
            report([batch_failed_notice()]);
            return Err(e.into());
        }
    };
    for failure in &batch.failures {
        warn!(slide = failure.index + 1, error = %failure.message, "slide left out of archive");
    }
    fs::write(out, &batch.archive.data).with_context(|| format!("writing {}", out.display()))?;
    report([batch.notice()]);
    println!("{}", out.display());
    Ok(())
}

fn export_slide(
    exporter: &SlideExporter,
    session: &CarouselSession,
    index: usize,
    aspect_ratio: AspectRatio,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let slide = session
        .deck()
        .get(index)
        .with_context(|| format!("deck has no slide {}", index + 1))?;
    report([slide_started_notice()]);
    let file = match exporter.export_slide(slide, index, aspect_ratio) {
        Ok(file) => file,
        Err(e) => {
            report([slide_failed_notice()]);
            return Err(e.into());
        }
    };
    let out = out.unwrap_or_else(|| PathBuf::from(&file.name));
    fs::write(&out, &file.data).with_context(|| format!("writing {}", out.display()))?;
    report([slide_exported_notice(index)]);
    println!("{}", out.display());
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<CarouselSession> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let document =
        DeckDocument::from_json(&json).with_context(|| format!("parsing {}", path.display()))?;
    debug!(path = %path.display(), slides = document.slides.len(), "deck loaded");
    Ok(CarouselSession::from_document(document)?)
}

fn save(path: &Path, session: &CarouselSession) -> anyhow::Result<()> {
    let json = session.to_document().to_json()?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), slides = session.deck().len(), "deck saved");
    Ok(())
}

fn to_index(number: usize) -> anyhow::Result<usize> {
    number
        .checked_sub(1)
        .context("slide and element numbers start at 1")
}

fn report(notices: impl IntoIterator<Item = Notice>) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Error => warn!(title = %notice.title, "{}", notice.description),
            NoticeLevel::Info | NoticeLevel::Success => {
                info!(title = %notice.title, "{}", notice.description);
            }
        }
        eprintln!("{notice}");
    }
}
