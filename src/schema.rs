//! Static description of the configuration form.
//!
//! Every control the page knows about is declared here, so both directions
//! of the sync (serializing a save request, applying a device reply) consult
//! the same table and never depend on markup traversal order.

/// How a field is edited and carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text input, sent verbatim.
    Text {
        /// A read-only element of the same name mirrors the value.
        mirror: bool,
    },
    /// Numeric input. An empty control is a defined 0, never omitted.
    Number,
    /// Checkbox, carried as 1 or 0.
    Flag,
    /// Select control; only the listed option values are accepted.
    Choice { options: &'static [&'static str] },
    /// Four ordered inputs sharing one name, carried as a 4-element array.
    Quad {
        /// A read-only element named `<name>T` shows the dotted join.
        mirror: bool,
    },
    /// Read-only text target, never serialized.
    Display,
    /// Read-only dotted rendering of a 4-element array, never serialized.
    DisplayQuad,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSpec {
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
    /// Whether the tab carries a save action (tab 0 and read-only tabs do not).
    pub savable: bool,
}

/// A mode value revealing dependent control groups.
///
/// When `field` decodes to `trigger`, every group in `shows` becomes visible;
/// any other value hides them. Groups are row containers in the markup, not
/// fields of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityRule {
    pub field: &'static str,
    pub trigger: i64,
    pub shows: &'static [&'static str],
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Text { mirror: false } }
}

const fn mirrored_text(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Text { mirror: true } }
}

const fn number(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Number }
}

const fn flag(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Flag }
}

const fn choice(name: &'static str, options: &'static [&'static str]) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Choice { options } }
}

const fn quad(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Quad { mirror: false } }
}

const fn mirrored_quad(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Quad { mirror: true } }
}

const fn display(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Display }
}

const fn display_quad(name: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::DisplayQuad }
}

/// Port operating modes: 0 DMX out, 1 DMX out with RDM, 2 DMX in, 3 LED pixels.
const PORT_A_MODES: &[&str] = &["0", "1", "2", "3"];
/// Port B has no DMX input path.
const PORT_B_MODES: &[&str] = &["0", "1", "3"];
/// 0 Art-Net, 1 sACN.
const PROTOCOLS: &[&str] = &["0", "1"];
/// 0 HTP, 1 LTP.
const MERGE_MODES: &[&str] = &["0", "1"];
/// Pixel mapping variants supported by the output driver.
const PIXEL_MODES: &[&str] = &["0", "1"];

/// All tabs in menu order. Tab 0 is the error/transitional panel and carries
/// no fields of its own.
pub static TABS: &[TabSpec] = &[
    TabSpec { title: "Device", fields: &[], savable: false },
    TabSpec {
        title: "Status",
        fields: &[
            display("wifiStatus"),
            display("macAddress"),
            display_quad("bcAddress"),
            display("fwVersion"),
        ],
        savable: false,
    },
    TabSpec {
        title: "WiFi",
        fields: &[
            mirrored_text("wifiSSID"),
            text("wifiPass"),
            text("hotspotSSID"),
            text("hotspotPass"),
            number("hotspotDelay"),
            flag("standAloneEnable"),
        ],
        savable: true,
    },
    TabSpec {
        title: "IP & Name",
        fields: &[
            mirrored_text("nodeName"),
            text("longName"),
            flag("dhcpEnable"),
            mirrored_quad("ipAddress"),
            mirrored_quad("subAddress"),
            quad("gwAddress"),
        ],
        savable: true,
    },
    TabSpec {
        title: "Port A",
        fields: &[
            choice("portAmode", PORT_A_MODES),
            choice("portAprot", PROTOCOLS),
            choice("portAmerge", MERGE_MODES),
            quad("portAuni"),
            quad("portAsACNuni"),
            number("portApixCount"),
            choice("portApixMode", PIXEL_MODES),
            quad("dmxInBroadcast"),
        ],
        savable: true,
    },
    TabSpec {
        title: "Port B",
        fields: &[
            choice("portBmode", PORT_B_MODES),
            choice("portBprot", PROTOCOLS),
            choice("portBmerge", MERGE_MODES),
            quad("portBuni"),
            quad("portBsACNuni"),
            number("portBpixCount"),
            choice("portBpixMode", PIXEL_MODES),
        ],
        savable: true,
    },
    TabSpec {
        title: "Scenes",
        fields: &[
            display("storedScenes"),
            number("sceneStartup"),
            flag("sceneAutoRun"),
        ],
        savable: true,
    },
    TabSpec { title: "Firmware", fields: &[], savable: false },
];

/// Mode-dependent rows. `portApix`/`portBpix` each cover the two pixel
/// configuration rows of their port; `DmxInBcAddrA` covers the DMX-in
/// broadcast address row.
pub static VISIBILITY_RULES: &[VisibilityRule] = &[
    VisibilityRule { field: "portAmode", trigger: 3, shows: &["portApix"] },
    VisibilityRule { field: "portAmode", trigger: 2, shows: &["DmxInBcAddrA"] },
    VisibilityRule { field: "portBmode", trigger: 3, shows: &["portBpix"] },
];

/// Look up a tab by index.
pub fn tab(index: usize) -> Option<&'static TabSpec> {
    TABS.get(index)
}

/// Look up a field by name across all tabs.
pub fn field(name: &str) -> Option<&'static FieldSpec> {
    TABS.iter()
        .flat_map(|tab| tab.fields.iter())
        .find(|spec| spec.name == name)
}

/// Rules triggered by the given field.
pub fn rules_for(name: &str) -> impl Iterator<Item = &'static VisibilityRule> + '_ {
    VISIBILITY_RULES.iter().filter(move |rule| rule.field == name)
}
