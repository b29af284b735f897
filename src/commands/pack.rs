use std::{
    collections::HashSet,
    env,
    io::{BufReader, BufWriter},
    mem,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use fs_err as fs;
use maxrects::{AnyBin, Bin, MaxRectsPacker, Rectangle};

use crate::{
    data::{AtlasConfig, AtlasManifest, PageManifest, SpriteManifest},
    image::Image,
    options::{LogicOption, PackOptions},
    sprite_name::SpriteName,
};

pub fn pack(options: PackOptions) -> anyhow::Result<()> {
    let config_path = match options.project_path {
        Some(path) => path,
        None => env::current_dir().context("could not locate the current directory")?,
    };

    let mut config = match AtlasConfig::read_from_folder_or_file(&config_path) {
        Ok(config) => config,
        Err(err) if err.is_not_found() => {
            bail!("no atlas.toml was found at {}", config_path.display())
        }
        Err(err) => return Err(err.into()),
    };

    if let Some(LogicOption(logic)) = options.logic {
        config.options.logic = logic;
    }

    let output_folder = options
        .output
        .unwrap_or_else(|| config.folder().to_owned());

    let load_mode = if options.manifest_only {
        LoadMode::MeasureOnly
    } else {
        LoadMode::Decode
    };

    let mut session = PackSession::new(config);
    session.discover_inputs(load_mode)?;
    session.pack();

    fs::create_dir_all(&output_folder)?;

    let mut manifest = session.manifest();
    if load_mode == LoadMode::Decode {
        for (index, page) in manifest.pages.iter_mut().enumerate() {
            page.image = session.write_page(index, &output_folder)?;
        }
    }

    let manifest_path = manifest.write_to_folder(&output_folder)?;

    log::info!(
        "Packed {} sprites into {} pages, wrote {}",
        session.packer.all_rects().len(),
        manifest.pages.len(),
        manifest_path.display()
    );

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadMode {
    /// Decode every input so that atlas pages can be composed.
    Decode,

    /// Only read the size of every input from its header.
    MeasureOnly,
}

/// What the packer carries along with each rectangle.
#[derive(Debug)]
struct Sprite {
    name: SpriteName,

    /// Pixels to copy into the page, if the sprite was decoded. Reserved
    /// regions never have one.
    image: Option<Image>,
}

/// A pack session holds all of the state for a single run of the
/// 'atlaspack pack' command.
struct PackSession {
    config: AtlasConfig,

    /// Sprites waiting to be packed, grouped by the page that asked for them.
    pending: Vec<Vec<Rectangle<u32, Sprite>>>,

    packer: MaxRectsPacker<u32, Sprite>,
}

impl PackSession {
    fn new(config: AtlasConfig) -> Self {
        let (width, height) = config.max_size;
        let packer = MaxRectsPacker::new(width, height, config.padding, config.options);
        let pending = config.pages.iter().map(|_| Vec::new()).collect();

        log::trace!("Starting pack session for atlas \"{}\"", config.name);

        Self {
            config,
            pending,
            packer,
        }
    }

    /// Finds every file matched by each page's input globs, and queues them
    /// along with each page's reserved regions.
    fn discover_inputs(&mut self, load_mode: LoadMode) -> anyhow::Result<()> {
        let root = self.config.folder().to_owned();
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut discovered = Vec::new();

        for (page_index, page) in self.config.pages.iter().enumerate() {
            for glob in &page.inputs {
                let paths = glob
                    .find_files(&root)
                    .with_context(|| format!("could not search for inputs matching {}", glob))?;

                for path in paths {
                    if !seen.insert(path.clone()) {
                        bail!(
                            "{} is matched by more than one input glob",
                            path.display()
                        );
                    }

                    discovered.push((page_index, path));
                }
            }
        }

        for (page_index, path) in discovered {
            let name = match SpriteName::from_paths(&root, &path) {
                Some(name) => name,
                None => bail!("input {} is outside of {}", path.display(), root.display()),
            };

            let (size, image) = load_sprite(&path, load_mode)
                .with_context(|| format!("could not read input {}", path.display()))?;

            log::trace!("Found input {} ({}x{})", name, size.0, size.1);
            self.push_sprite(page_index, name, size, image);
        }

        let reserved: Vec<_> = self
            .config
            .pages
            .iter()
            .enumerate()
            .flat_map(|(page_index, page)| {
                page.reserve
                    .iter()
                    .map(move |reserve| (page_index, reserve.clone()))
            })
            .collect();

        for (page_index, reserve) in reserved {
            self.push_sprite(page_index, reserve.name.as_str().into(), reserve.size, None);
        }

        Ok(())
    }

    fn push_sprite(
        &mut self,
        page_index: usize,
        name: SpriteName,
        size: (u32, u32),
        image: Option<Image>,
    ) {
        let rect = Rectangle::with_data(size, Sprite { name, image })
            .rotation_allowed(self.config.options.allow_rotation);

        self.pending[page_index].push(rect);
    }

    /// Packs every queued sprite. Each configured page starts with a fresh
    /// bin, so sprites from different pages never share one.
    fn pack(&mut self) {
        for (page_index, sprites) in mem::take(&mut self.pending).into_iter().enumerate() {
            if page_index > 0 {
                self.packer.next();
            }

            log::debug!("Packing {} sprites for page {}", sprites.len(), page_index);
            self.packer.add_batch(sprites);
        }

        for bin in self.packer.bins() {
            if bin.is_oversized() {
                for rect in bin.rects() {
                    log::warn!(
                        "{} ({}x{}) is larger than the maximum atlas size of {}x{}, it was given a page of its own",
                        rect.data().name,
                        rect.width(),
                        rect.height(),
                        self.config.max_size.0,
                        self.config.max_size.1,
                    );
                }
            }
        }
    }

    /// Describes the current layout. Pages are listed without images, which
    /// are filled in as they're written.
    fn manifest(&self) -> AtlasManifest {
        let pages = self
            .packer
            .bins()
            .iter()
            .map(|bin| PageManifest {
                image: None,
                size: (bin.width(), bin.height()),
                oversized: bin.is_oversized(),
                occupancy: bin.occupancy(),
                sprites: bin
                    .rects()
                    .iter()
                    .map(|rect| SpriteManifest {
                        name: rect.data().name.clone(),
                        offset: rect.position(),
                        size: rect.size(),
                        rotated: rect.is_rotated(),
                    })
                    .collect(),
            })
            .collect();

        AtlasManifest {
            name: self.config.name.clone(),
            pages,
        }
    }

    /// Composes one page and saves it as a PNG, returning its file name.
    /// Pages with no area don't get an image.
    fn write_page(&self, index: usize, output_folder: &Path) -> anyhow::Result<Option<String>> {
        let bin = &self.packer.bins()[index];

        if bin.width() == 0 || bin.height() == 0 {
            log::debug!("Page {} is empty, skipping its image", index);
            return Ok(None);
        }

        let file_name = format!("{}-{}.png", self.config.name, index);
        let file_path = output_folder.join(&file_name);

        let image = compose_page(bin);
        let file = BufWriter::new(fs::File::create(&file_path)?);
        image
            .encode_png(file)
            .with_context(|| format!("could not write {}", file_path.display()))?;

        log::debug!("Wrote page {} to {}", index, file_path.display());

        Ok(Some(file_name))
    }
}

fn load_sprite(path: &Path, load_mode: LoadMode) -> anyhow::Result<((u32, u32), Option<Image>)> {
    let file = BufReader::new(fs::File::open(path)?);

    match load_mode {
        LoadMode::Decode => {
            let image = Image::decode_png(file)?;
            Ok((image.size(), Some(image)))
        }
        LoadMode::MeasureOnly => Ok((Image::read_png_size(file)?, None)),
    }
}

/// Copies every decoded sprite in a bin into a new image the size of the
/// bin. Rotated sprites are turned to match their placement.
fn compose_page(bin: &AnyBin<u32, Sprite>) -> Image {
    let mut page = Image::new_empty_rgba8((bin.width(), bin.height()));

    for rect in bin.rects() {
        if let Some(image) = &rect.data().image {
            if rect.is_rotated() {
                page.blit(&image.rotated_clockwise(), rect.position());
            } else {
                page.blit(image, rect.position());
            }
        }
    }

    page
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::{
        data::{PageConfig, ReserveConfig},
        image::Pixel,
    };
    use maxrects::PackingOptions;

    fn test_project() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("test-projects")
            .join("sprites")
    }

    fn filled(size: (u32, u32), pixel: Pixel) -> Image {
        let mut image = Image::new_empty_rgba8(size);
        for y in 0..size.1 {
            for x in 0..size.0 {
                image.set_pixel((x, y), pixel);
            }
        }
        image
    }

    fn config_with_pages(pages: usize, options: PackingOptions<u32>) -> AtlasConfig {
        AtlasConfig {
            name: "test".to_owned(),
            max_size: (64, 64),
            padding: 0,
            options,
            pages: vec![
                PageConfig {
                    inputs: Vec::new(),
                    reserve: Vec::new(),
                };
                pages
            ],
            file_path: PathBuf::from("atlas.toml"),
        }
    }

    #[test]
    fn test_project_layout() {
        let config = AtlasConfig::read_from_folder(test_project()).unwrap();

        let mut session = PackSession::new(config);
        session.discover_inputs(LoadMode::MeasureOnly).unwrap();
        session.pack();

        let manifest = session.manifest();
        assert_eq!(manifest.name, "sprites");
        assert_eq!(manifest.pages.len(), 2);

        let icons = &manifest.pages[0];
        assert_eq!(icons.size, (49, 48));
        let placed: Vec<_> = icons
            .sprites
            .iter()
            .map(|sprite| (sprite.name.as_ref(), sprite.offset, sprite.size))
            .collect();
        assert_eq!(
            placed,
            vec![
                ("icons/open.png", (0, 0), (16, 48)),
                ("icons/close.png", (17, 0), (32, 32)),
            ]
        );
        assert!((icons.occupancy - 1792.0 / 2352.0).abs() < 1e-9);

        let cursors = &manifest.pages[1];
        assert_eq!(cursors.size, (29, 10));
        let placed: Vec<_> = cursors
            .sprites
            .iter()
            .map(|sprite| (sprite.name.as_ref(), sprite.offset))
            .collect();
        assert_eq!(
            placed,
            vec![("glyphs", (0, 0)), ("cursors/pointer.png", (21, 0))]
        );
    }

    #[test]
    fn decoded_inputs_are_composed_into_pages() {
        let config = AtlasConfig::read_from_folder(test_project()).unwrap();

        let mut session = PackSession::new(config);
        session.discover_inputs(LoadMode::Decode).unwrap();
        session.pack();

        let icons = compose_page(&session.packer.bins()[0]);
        assert_eq!(icons.size(), (49, 48));
        assert_eq!(icons.get_pixel((0, 47)), Pixel::new(0, 255, 0, 255));
        assert_eq!(icons.get_pixel((16, 0)), Pixel::new(0, 0, 0, 0));
        assert_eq!(icons.get_pixel((48, 31)), Pixel::new(255, 0, 0, 255));
        assert_eq!(icons.get_pixel((48, 32)), Pixel::new(0, 0, 0, 0));

        // The cursor is stored as RGB, and the reserved region stays blank.
        let cursors = compose_page(&session.packer.bins()[1]);
        assert_eq!(cursors.get_pixel((21, 0)), Pixel::new(0, 0, 255, 255));
        assert_eq!(cursors.get_pixel((5, 5)), Pixel::new(0, 0, 0, 0));
    }

    #[test]
    fn overlapping_globs_are_an_error() {
        let mut config = AtlasConfig::read_from_folder(test_project()).unwrap();
        config.pages[1].inputs.push(crate::glob::Glob::new("**/open.png").unwrap());

        let mut session = PackSession::new(config);
        let error = session.discover_inputs(LoadMode::MeasureOnly).unwrap_err();

        assert!(error.to_string().contains("more than one input glob"));
    }

    #[test]
    fn rotated_sprites_are_turned_in_the_page() {
        let options = PackingOptions {
            allow_rotation: true,
            power_of_two: false,
            ..PackingOptions::default()
        };
        let mut config = config_with_pages(1, options);
        config.max_size = (8, 4);

        let mut tall = filled((2, 8), Pixel::new(9, 9, 9, 255));
        tall.set_pixel((0, 7), Pixel::new(1, 2, 3, 255));

        let mut session = PackSession::new(config);
        session.push_sprite(0, "tall".into(), (2, 8), Some(tall));
        session.pack();

        let bin = &session.packer.bins()[0];
        assert!(bin.rects()[0].is_rotated());
        assert_eq!(bin.rects()[0].size(), (8, 2));

        // The bottom-left corner of the sprite ends up top-left.
        let page = compose_page(bin);
        assert_eq!(page.get_pixel((0, 0)), Pixel::new(1, 2, 3, 255));
        assert_eq!(page.get_pixel((7, 1)), Pixel::new(9, 9, 9, 255));
    }

    #[test]
    fn pages_never_share_bins() {
        let mut config = config_with_pages(3, PackingOptions::default());
        config.pages[0].reserve.push(ReserveConfig {
            name: "a".to_owned(),
            size: (8, 8),
        });
        config.pages[2].reserve.push(ReserveConfig {
            name: "b".to_owned(),
            size: (8, 8),
        });

        let mut session = PackSession::new(config);
        session.discover_inputs(LoadMode::MeasureOnly).unwrap();
        session.pack();

        let manifest = session.manifest();
        assert_eq!(manifest.pages.len(), 2);
        assert_eq!(manifest.pages[0].sprites[0].name.as_ref(), "a");
        assert_eq!(manifest.pages[1].sprites[0].name.as_ref(), "b");
    }

    #[test]
    fn oversized_sprites_get_their_own_page() {
        let config = config_with_pages(1, PackingOptions::default());

        let mut session = PackSession::new(config);
        session.push_sprite(0, "small".into(), (16, 16), None);
        session.push_sprite(0, "banner".into(), (128, 16), None);
        session.pack();

        let manifest = session.manifest();
        let banner = manifest
            .pages
            .iter()
            .find(|page| page.sprites[0].name.as_ref() == "banner")
            .unwrap();

        assert!(banner.oversized);
        assert_eq!(banner.size, (128, 16));
        assert_eq!(banner.sprites.len(), 1);
    }
}
