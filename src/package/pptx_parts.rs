//! PresentationML part bodies for a picture-only deck.
//!
//! Static parts (master, blank layout, theme, props) are constants; the
//! per-slide and per-deck parts are built with `format!`. Relationship IDs
//! in `presentation.xml.rels` are fixed for the first five targets and
//! slides follow from `rId6`.

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_OFFICE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const EMPTY_GROUP: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

/// First relationship ID used for slides in `presentation.xml.rels`.
pub(crate) const FIRST_SLIDE_RID: usize = 6;

/// First `<p:sldId id>`; PowerPoint requires ids ≥ 256.
const FIRST_SLIDE_ID: usize = 256;

pub(crate) const PNG_CT: &str = "image/png";

pub(crate) fn package_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{REL_OFFICE}/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="{REL_OFFICE}/extended-properties" Target="docProps/app.xml"/></Relationships>"#
    )
}

pub(crate) fn content_types(slide_count: usize) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="{PNG_CT}"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/ppt/presProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presProps+xml"/><Override PartName="/ppt/viewProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml"/><Override PartName="/ppt/tableStyles.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#
    );
    for n in 1..=slide_count {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

pub(crate) fn core_props() -> String {
    format!(
        r#"{XML_DECL}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>Converted PDF</dc:title><dc:creator>pdfdeck</dc:creator></cp:coreProperties>"#
    )
}

pub(crate) fn app_props(slide_count: usize) -> String {
    format!(
        r#"{XML_DECL}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>pdfdeck</Application><Slides>{slide_count}</Slides></Properties>"#
    )
}

pub(crate) fn presentation(slide_count: usize, width: u64, height: u64) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<p:presentation {NS} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#
    );
    if slide_count > 0 {
        xml.push_str("<p:sldIdLst>");
        for i in 0..slide_count {
            xml.push_str(&format!(
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                FIRST_SLIDE_ID + i,
                FIRST_SLIDE_RID + i
            ));
        }
        xml.push_str("</p:sldIdLst>");
    }
    xml.push_str(&format!(
        r#"<p:sldSz cx="{width}" cy="{height}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    ));
    xml
}

pub(crate) fn presentation_rels(slide_count: usize) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{REL_OFFICE}/slideMaster" Target="slideMasters/slideMaster1.xml"/><Relationship Id="rId2" Type="{REL_OFFICE}/theme" Target="theme/theme1.xml"/><Relationship Id="rId3" Type="{REL_OFFICE}/presProps" Target="presProps.xml"/><Relationship Id="rId4" Type="{REL_OFFICE}/viewProps" Target="viewProps.xml"/><Relationship Id="rId5" Type="{REL_OFFICE}/tableStyles" Target="tableStyles.xml"/>"#
    );
    for i in 0..slide_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{REL_OFFICE}/slide" Target="slides/slide{}.xml"/>"#,
            FIRST_SLIDE_RID + i,
            i + 1
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

pub(crate) fn pres_props() -> String {
    format!(r#"{XML_DECL}<p:presentationPr {NS}/>"#)
}

pub(crate) fn view_props() -> String {
    format!(r#"{XML_DECL}<p:viewPr {NS}/>"#)
}

pub(crate) fn table_styles() -> String {
    format!(
        r#"{XML_DECL}<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#
    )
}

pub(crate) fn slide_master() -> String {
    format!(
        r#"{XML_DECL}<p:sldMaster {NS}><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{EMPTY_GROUP}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles></p:sldMaster>"#
    )
}

pub(crate) fn slide_master_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{REL_OFFICE}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="{REL_OFFICE}/theme" Target="../theme/theme1.xml"/></Relationships>"#
    )
}

pub(crate) fn blank_layout() -> String {
    format!(
        r#"{XML_DECL}<p:sldLayout {NS} type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{EMPTY_GROUP}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

pub(crate) fn blank_layout_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{REL_OFFICE}/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#
    )
}

pub(crate) fn theme() -> String {
    const SOLID: &str = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    const EFFECT: &str = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    format!(
        r#"{XML_DECL}<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2><a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2><a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4><a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6><a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst>{SOLID}{SOLID}{SOLID}</a:fillStyleLst><a:lnStyleLst><a:ln w="9525">{SOLID}</a:ln><a:ln w="25400">{SOLID}</a:ln><a:ln w="38100">{SOLID}</a:ln></a:lnStyleLst><a:effectStyleLst>{EFFECT}{EFFECT}{EFFECT}</a:effectStyleLst><a:bgFillStyleLst>{SOLID}{SOLID}{SOLID}</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#
    )
}

/// A slide holding one picture at the given EMU geometry.
pub(crate) fn picture_slide(descr: &str, x: u64, y: u64, cx: u64, cy: u64) -> String {
    format!(
        r#"{XML_DECL}<p:sld {NS}><p:cSld><p:spTree>{EMPTY_GROUP}<p:pic><p:nvPicPr><p:cNvPr id="2" name="Picture 1" descr="{descr}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

pub(crate) fn picture_slide_rels(media_name: &str) -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{REL_NS}"><Relationship Id="rId1" Type="{REL_OFFICE}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="{REL_OFFICE}/image" Target="../media/{media_name}"/></Relationships>"#
    )
}
