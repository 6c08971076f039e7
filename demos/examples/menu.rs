// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scrolling menu built from declarative lengths.
//!
//! Buttons are sized from the strings a scene description would carry
//! (`"80%"`, `"square"`, `"auto"`) and centered with percentage margins. The
//! column overflows the window, so it grows a vertical scrollbar; scrolling
//! moves the buttons under a fixed pointer.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p trellis_demos --example menu`

use kurbo::Point;
use trellis_layout::{
    Align, ContainerRelative, ContainerStyle, Element, GridConfig, Length, Margin, Margins,
    Position, ScrollAxes, Size,
};
use trellis_scene::{QueryFilter, Scene};

fn button(width: &str, height: &str) -> Result<Position, Box<dyn std::error::Error>> {
    let spec = ContainerRelative {
        width: width.parse()?,
        height: height.parse()?,
        margins: Margins {
            left: Some("50%".parse()?),
            top: Some(Margin::Px(6)),
            bottom: Some(Margin::Px(6)),
            ..Margins::default()
        },
        ..ContainerRelative::default()
    };
    Ok(Position::container(spec)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut scene = Scene::new(Size::new(240, 160));
    let menu = scene.add_layer(
        "menu",
        ContainerStyle {
            align: Align::Column,
            overflow: ScrollAxes::VERTICAL,
            scrollbar_thickness: 6,
            ..ContainerStyle::default()
        },
    );

    let labels = ["Continue", "New game", "Load", "Options", "Credits", "Quit"];
    let mut buttons = Vec::new();
    for label in labels {
        let id = scene.add_element(menu, None, Element::leaf(label, button("80%", "30")?))?;
        buttons.push(id);
    }

    // A strip of square icons packed into a grid under the buttons.
    let icons = scene.add_element(
        menu,
        None,
        Element::container(
            "icons",
            Position::container(ContainerRelative::sized(Length::Percent(100.0), Length::Auto))?,
            ContainerStyle {
                align: Align::Grid,
                grid: GridConfig {
                    cols: 4,
                    row_spacing: 4,
                    col_spacing: 4,
                },
                ..ContainerStyle::default()
            },
        ),
    )?;
    for i in 0..6 {
        scene.add_element(
            menu,
            Some(icons),
            Element::leaf(format!("icon{i}"), button("square", "40")?),
        )?;
    }

    scene.commit();
    let root = scene.layer_root(menu).ok_or("menu layer has a root")?;
    let layout = scene.layout();
    println!(
        "content {}x{} in a {:?} window",
        layout.content_width(root).unwrap_or_default(),
        layout.content_height(root).unwrap_or_default(),
        layout.window_size()
    );
    for &id in layout.children_of(root) {
        println!("{:>10} {:?}", layout.name_of(id).unwrap_or("?"), layout.rect(id));
    }

    let pointer = Point::new(120.0, 100.0);
    for _ in 0..4 {
        let hit = scene.hit_test(pointer, QueryFilter::new().pickable());
        let layout = scene.layout();
        let thumb = layout
            .scrollbars(root)
            .and_then(|bars| bars.vertical)
            .map(|bar| bar.thumb_rect());
        println!(
            "offset {:?}: pointer over {:?}, thumb {:?}",
            layout.scroll_offset(root),
            hit.and_then(|id| layout.name_of(id)),
            thumb
        );
        scene.layout_mut().update_scroll_layout(root, 0, -40)?;
        scene.commit();
    }
    Ok(())
}
